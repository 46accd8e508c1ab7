// ABOUTME: Classifier battery: first-match-wins rule cascades over one annotated sentence.
// ABOUTME: Defines Rule, Cascade, the shared SentenceContext, and label_sentence which runs them all.

//! Sentence classifiers.
//!
//! Every classifier is a [`Cascade`]: an ordered table of named rules plus a
//! default label. Rules are evaluated top to bottom and the first predicate
//! that holds decides the label. The order of each table is part of its
//! behaviour; the tables are public so each rule can be exercised alone.
//!
//! Some classifiers read labels produced by earlier ones (clarity reads
//! structure, voice and informative type; provenance reads informative
//! type). [`label_sentence`] runs them in dependency order and records those
//! labels on the context as it goes.

pub mod citation;
pub mod clarity;
pub mod entities;
pub mod functional;
pub mod grammar;
pub mod informative;
pub mod labels;
pub mod pronoun;
pub mod provenance;
pub mod quality;
pub mod structure;

use crate::annotation::{AnnotatedSentence, AnnotatedToken};
use crate::lexicon::CompiledLexicon;
use crate::options::CompiledOptions;

pub use entities::EntitySummary;
pub use labels::{
    ClarityType, FunctionalType, InfoQuality, InformativeType, SourceType, Structure, Voice,
};

/// Texts shorter than this many characters get conservative defaults.
pub const MIN_TEXT_CHARS: usize = 2;

/// One named rule: when `when` holds, the cascade answers `label`.
pub struct Rule<L: 'static> {
    pub name: &'static str,
    pub when: fn(&SentenceContext<'_>) -> bool,
    pub label: L,
}

/// An ordered rule table with a default.
pub struct Cascade<L: 'static> {
    pub rules: &'static [Rule<L>],
    pub default: L,
}

impl<L: Copy> Cascade<L> {
    /// Label from the first matching rule, or the default.
    pub fn evaluate(&self, ctx: &SentenceContext<'_>) -> L {
        self.matching_rule(ctx)
            .map(|r| r.label)
            .unwrap_or(self.default)
    }

    /// The first rule whose predicate holds.
    pub fn matching_rule(&self, ctx: &SentenceContext<'_>) -> Option<&'static Rule<L>> {
        self.rules.iter().find(|r| (r.when)(ctx))
    }

    /// Names of the rules in priority order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

/// Everything a rule may look at for one sentence.
#[derive(Debug, Clone)]
pub struct SentenceContext<'a> {
    pub sentence: &'a AnnotatedSentence,
    /// Raw text, trimmed.
    pub text: &'a str,
    /// Lowercased `text`.
    pub lower: String,
    pub opts: &'a CompiledOptions,
    /// Relevance state before this sentence is processed.
    pub keyword_active: bool,
    pub structure: Option<Structure>,
    pub voice: Option<Voice>,
    pub informative: Option<InformativeType>,
}

impl<'a> SentenceContext<'a> {
    pub fn new(sentence: &'a AnnotatedSentence, text: &'a str, opts: &'a CompiledOptions) -> Self {
        let text = text.trim();
        Self {
            sentence,
            text,
            lower: text.to_lowercase(),
            opts,
            keyword_active: true,
            structure: None,
            voice: None,
            informative: None,
        }
    }

    /// Set the relevance state the sentence is read under.
    pub fn with_keyword_active(mut self, active: bool) -> Self {
        self.keyword_active = active;
        self
    }

    pub fn lexicon(&self) -> &CompiledLexicon {
        &self.opts.lexicon
    }

    pub fn tokens(&self) -> &'a [AnnotatedToken] {
        &self.sentence.tokens
    }

    /// True for empty or one-character texts.
    pub fn is_near_empty(&self) -> bool {
        self.text.chars().count() < MIN_TEXT_CHARS
    }

    /// Lowercased subject tokens.
    pub fn subject_words(&self) -> Vec<String> {
        self.tokens()
            .iter()
            .filter(|t| t.dep.is_subject())
            .map(|t| t.lower())
            .collect()
    }

    /// True when a subject is a first-person marker or a configured brand term.
    pub fn has_first_person_subject(&self) -> bool {
        let lex = self.lexicon();
        self.tokens().iter().filter(|t| t.dep.is_subject()).any(|t| {
            let lower = t.lower();
            lex.first_person_markers.contains(&lower) || self.opts.brand_terms.contains(&lower)
        })
    }

    /// True when any token lemma is in `lemmas`.
    pub fn has_lemma_in(&self, lemmas: &std::collections::HashSet<String>) -> bool {
        self.tokens()
            .iter()
            .any(|t| lemmas.contains(&t.lemma.to_lowercase()))
    }
}

/// Labels for one sentence that do not depend on the keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceLabels {
    pub functional: FunctionalType,
    pub structure: Structure,
    pub voice: Voice,
    pub informative: InformativeType,
    pub info_quality: InfoQuality,
    pub clarity: ClarityType,
    pub claims_citation: bool,
    /// Heuristic grammar signal; the tagger may replace it with the checker's.
    pub grammatical: bool,
    pub has_pronoun: bool,
    pub self_contained: bool,
    pub source_type: SourceType,
    pub entities: EntitySummary,
}

/// Run every classifier over one sentence, in dependency order.
pub fn label_sentence(mut ctx: SentenceContext<'_>) -> SentenceLabels {
    let functional = functional::CASCADE.evaluate(&ctx);
    let structure = structure::classify_structure(&ctx);
    let voice = structure::VOICE.evaluate(&ctx);
    let informative = informative::classify(&ctx);
    ctx.structure = Some(structure);
    ctx.voice = Some(voice);
    ctx.informative = Some(informative);

    SentenceLabels {
        functional,
        structure,
        voice,
        informative,
        info_quality: quality::classify(&ctx),
        clarity: clarity::CASCADE.evaluate(&ctx),
        claims_citation: citation::classify(&ctx),
        grammatical: grammar::is_grammatical(&ctx),
        has_pronoun: pronoun::has_pronoun(&ctx),
        self_contained: pronoun::is_self_contained(&ctx),
        source_type: provenance::classify(&ctx),
        entities: entities::summarize(&ctx),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const PASSIVE: &str = "
# text = The form was filed by our team.
1 The   the   DET   DT   _ 2 det       _ _
2 form  form  NOUN  NN   Number=Sing 4 nsubjpass _ _
3 was   be    AUX   VBD  Number=Sing 4 auxpass   _ _
4 filed file  VERB  VBN  _ 0 ROOT      _ _
5 by    by    ADP   IN   _ 4 agent     _ _
6 our   our   PRON  PRP$ _ 7 poss      _ _
7 team  team  NOUN  NN   Number=Sing 5 pobj _ _
8 .     .     PUNCT .    _ 4 punct     _ _
";

    #[test]
    fn label_sentence_fills_every_axis() {
        let s = sent(PASSIVE);
        let labels = label_sentence(SentenceContext::new(&s, &s.text, &OPTS));
        assert_eq!(labels.functional, FunctionalType::Declarative);
        assert_eq!(labels.structure, Structure::Simple);
        assert_eq!(labels.voice, Voice::Passive);
        assert_eq!(labels.clarity, ClarityType::ModerateComplexity);
        assert!(labels.grammatical);
        assert!(labels.has_pronoun);
        assert!(labels.self_contained);
    }

    #[test]
    fn labeling_is_deterministic() {
        let s = sent(PASSIVE);
        let a = label_sentence(SentenceContext::new(&s, &s.text, &OPTS));
        let b = label_sentence(SentenceContext::new(&s, &s.text, &OPTS));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_sentence_gets_safe_defaults() {
        let s = AnnotatedSentence::default();
        let labels = label_sentence(SentenceContext::new(&s, "", &OPTS));
        assert_eq!(labels.structure, Structure::Fragment);
        assert_eq!(labels.informative, InformativeType::Filler);
        assert_eq!(labels.clarity, ClarityType::UnIndexable);
        assert_eq!(labels.source_type, SourceType::Unknown);
        assert!(!labels.grammatical);
        assert!(!labels.claims_citation);
    }

    #[test]
    fn cascade_reports_first_matching_rule() {
        let s = sent("1 Stop stop VERB VB _ 0 ROOT _ _\n2 ! ! PUNCT . _ 1 punct _ _\n");
        let ctx = SentenceContext::new(&s, "Stop!", &OPTS);
        let rule = functional::CASCADE.matching_rule(&ctx).unwrap();
        assert_eq!(rule.name, "ends_with_exclamation");
        assert_eq!(functional::CASCADE.evaluate(&ctx), FunctionalType::Exclamatory);
    }
}
