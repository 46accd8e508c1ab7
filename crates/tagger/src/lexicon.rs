// ABOUTME: Phrase and word lists that drive the classifier heuristics, plus their compiled matchers.
// ABOUTME: The builtin lexicon is embedded JSON; callers may supply their own through options.

//! Classifier lexicon.
//!
//! Every marker phrase the classifiers look for lives here rather than in
//! the rule code, so deployments can tune vocabulary without a rebuild.
//! Phrase lists compile into case-insensitive `aho-corasick` automatons that
//! only report whole-word hits.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};

/// Embedded JSON containing the default lexicon.
const BUILTIN_LEXICON_JSON: &str = include_str!("../data/lexicon.json");

static BUILTIN: Lazy<CompiledLexicon> = Lazy::new(|| {
    CompiledLexicon::compile(&load_builtin_lexicon()).expect("failed to compile builtin lexicon")
});

/// Raw, serializable word and phrase lists.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Lexicon {
    pub question_openers: Vec<String>,
    pub noise_prefixes: Vec<String>,
    pub suggestion_phrases: Vec<String>,
    pub definition_phrases: Vec<String>,
    pub prediction_phrases: Vec<String>,
    pub hedge_words: Vec<String>,
    pub transition_openers: Vec<String>,
    pub opinion_phrases: Vec<String>,
    pub observation_phrases: Vec<String>,
    pub attribution_phrases: Vec<String>,
    pub first_person_source_phrases: Vec<String>,
    pub first_person_markers: Vec<String>,
    pub absolute_phrases: Vec<String>,
    pub reporting_lemmas: Vec<String>,
    pub deictic_phrases: Vec<String>,
    pub reference_phrases: Vec<String>,
    pub opening_pronouns: Vec<String>,
    pub discovery_lemmas: Vec<String>,
    pub regulatory_keywords: Vec<String>,
    pub interaction_lemmas: Vec<String>,
    pub interaction_objects: Vec<String>,
    pub brand_phrases: Vec<String>,
    pub technical_document_pattern: String,
}

/// Loads the builtin lexicon from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed.
pub fn load_builtin_lexicon() -> Lexicon {
    serde_json::from_str(BUILTIN_LEXICON_JSON).expect("failed to parse builtin lexicon")
}

/// The compiled builtin lexicon, shared process-wide.
pub fn builtin() -> &'static CompiledLexicon {
    &BUILTIN
}

/// A set of phrases matched case-insensitively on word boundaries.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    phrases: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl PhraseSet {
    pub fn new(phrases: &[String]) -> Result<Self> {
        let phrases: Vec<String> = phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return Ok(Self {
                phrases,
                matcher: None,
            });
        }
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&phrases)
            .map_err(|e| TaggerError::config("compile phrase set", phrases.join("|"), Some(e.into())))?;
        Ok(Self {
            phrases,
            matcher: Some(matcher),
        })
    }

    /// True when any phrase occurs in `text` as whole words.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// The first whole-word phrase hit in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        let matcher = self.matcher.as_ref()?;
        matcher
            .find_overlapping_iter(text)
            .find(|m| on_word_boundaries(text, m.start(), m.end()))
            .map(|m| self.phrases[m.pattern().as_usize()].as_str())
    }

    /// True when `text` (trimmed, case-insensitive) starts with any phrase.
    pub fn is_prefix_of(&self, text: &str) -> bool {
        let lower = text.trim_start().to_lowercase();
        self.phrases.iter().any(|p| lower.starts_with(p.as_str()))
    }

    /// Like [`is_prefix_of`](Self::is_prefix_of) but the phrase must end on a word boundary.
    pub fn starts(&self, text: &str) -> bool {
        let lower = text.trim_start().to_lowercase();
        self.phrases.iter().any(|p| {
            lower.starts_with(p.as_str()) && on_word_boundaries(&lower, 0, p.len())
        })
    }

    /// True when a single word equals one of the phrases.
    pub fn contains_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.phrases.iter().any(|p| *p == lower)
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// A phrase edge that is itself punctuation ("url :", "100%") needs no boundary.
fn on_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let matched = &text[start..end];
    let first_is_word = matched.chars().next().is_some_and(is_word_char);
    let last_is_word = matched.chars().last().is_some_and(is_word_char);

    let before_ok = !first_is_word || !text[..start].chars().last().is_some_and(is_word_char);
    let after_ok = !last_is_word || !text[end..].chars().next().is_some_and(is_word_char);
    before_ok && after_ok
}

fn word_set(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Lexicon with every list compiled for matching.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub question_openers: HashSet<String>,
    pub noise_prefixes: PhraseSet,
    pub suggestion_phrases: PhraseSet,
    pub definition_phrases: PhraseSet,
    pub prediction_phrases: PhraseSet,
    pub hedge_words: PhraseSet,
    pub transition_openers: PhraseSet,
    pub opinion_phrases: PhraseSet,
    pub observation_phrases: PhraseSet,
    pub attribution_phrases: PhraseSet,
    pub first_person_source_phrases: PhraseSet,
    pub first_person_markers: HashSet<String>,
    pub absolute_phrases: PhraseSet,
    pub reporting_lemmas: HashSet<String>,
    pub deictic_phrases: PhraseSet,
    pub reference_phrases: PhraseSet,
    pub opening_pronouns: HashSet<String>,
    pub discovery_lemmas: HashSet<String>,
    pub regulatory_keywords: PhraseSet,
    pub interaction_lemmas: HashSet<String>,
    pub interaction_objects: PhraseSet,
    pub brand_phrases: PhraseSet,
    pub technical_document: Option<Regex>,
}

impl CompiledLexicon {
    /// Compile every list. Invalid regexes and automaton failures are config errors.
    pub fn compile(lex: &Lexicon) -> Result<Self> {
        let technical_document = if lex.technical_document_pattern.trim().is_empty() {
            None
        } else {
            Some(Regex::new(&lex.technical_document_pattern).map_err(|e| {
                TaggerError::config(
                    "compile technical document pattern",
                    lex.technical_document_pattern.clone(),
                    Some(e.into()),
                )
            })?)
        };

        Ok(Self {
            question_openers: word_set(&lex.question_openers),
            noise_prefixes: PhraseSet::new(&lex.noise_prefixes)?,
            suggestion_phrases: PhraseSet::new(&lex.suggestion_phrases)?,
            definition_phrases: PhraseSet::new(&lex.definition_phrases)?,
            prediction_phrases: PhraseSet::new(&lex.prediction_phrases)?,
            hedge_words: PhraseSet::new(&lex.hedge_words)?,
            transition_openers: PhraseSet::new(&lex.transition_openers)?,
            opinion_phrases: PhraseSet::new(&lex.opinion_phrases)?,
            observation_phrases: PhraseSet::new(&lex.observation_phrases)?,
            attribution_phrases: PhraseSet::new(&lex.attribution_phrases)?,
            first_person_source_phrases: PhraseSet::new(&lex.first_person_source_phrases)?,
            first_person_markers: word_set(&lex.first_person_markers),
            absolute_phrases: PhraseSet::new(&lex.absolute_phrases)?,
            reporting_lemmas: word_set(&lex.reporting_lemmas),
            deictic_phrases: PhraseSet::new(&lex.deictic_phrases)?,
            reference_phrases: PhraseSet::new(&lex.reference_phrases)?,
            opening_pronouns: word_set(&lex.opening_pronouns),
            discovery_lemmas: word_set(&lex.discovery_lemmas),
            regulatory_keywords: PhraseSet::new(&lex.regulatory_keywords)?,
            interaction_lemmas: word_set(&lex.interaction_lemmas),
            interaction_objects: PhraseSet::new(&lex.interaction_objects)?,
            brand_phrases: PhraseSet::new(&lex.brand_phrases)?,
            technical_document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(phrases: &[&str]) -> PhraseSet {
        let owned: Vec<String> = phrases.iter().map(|s| s.to_string()).collect();
        PhraseSet::new(&owned).unwrap()
    }

    #[test]
    fn builtin_lexicon_loads_and_compiles() {
        let lex = load_builtin_lexicon();
        assert!(!lex.attribution_phrases.is_empty());
        assert!(builtin().opening_pronouns.contains("it"));
        assert!(builtin().technical_document.is_some());
    }

    #[test]
    fn matches_whole_words_only() {
        let s = set(&["is", "will"]);
        assert!(s.is_match("This is fine"));
        assert!(!s.is_match("This island"));
        assert!(!s.is_match("Goodwill hunting"));
        assert!(s.is_match("It WILL rain."));
    }

    #[test]
    fn overlapping_candidates_still_find_later_hit() {
        let s = set(&["per the", "as per"]);
        assert!(s.is_match("Paid as per contract."));
        assert_eq!(s.find("Paid as per contract."), Some("as per"));
    }

    #[test]
    fn punctuation_edges_skip_boundary_check() {
        let s = set(&["100%", "url :"]);
        assert!(s.is_match("It is 100% safe."));
        assert!(s.is_prefix_of("URL : /taxes"));
    }

    #[test]
    fn starts_requires_a_word_edge() {
        let s = set(&["next"]);
        assert!(s.starts("Next, file the form."));
        assert!(!s.starts("Nextcloud stores files."));
        assert!(s.is_prefix_of("Nextcloud stores files."));
    }

    #[test]
    fn empty_set_never_matches() {
        let s = set(&[]);
        assert!(s.is_empty());
        assert!(!s.is_match("anything"));
    }

    #[test]
    fn bad_technical_pattern_is_config_error() {
        let lex = Lexicon {
            technical_document_pattern: "(".to_string(),
            ..Lexicon::default()
        };
        assert!(CompiledLexicon::compile(&lex).unwrap_err().is_config());
    }
}
