// ABOUTME: Cross-sentence keyword relevance state machine and the answer-sentence decision.
// ABOUTME: One RelevanceState is created per request and threaded through its sentences in order.

//! Keyword relevance.
//!
//! The state machine tracks whether the target keyword is "in focus". A
//! sentence whose grammatical subject overlaps the keyword brings it into
//! focus; a sentence about some other subject takes it out of focus; a
//! sentence opening with a pronoun while the keyword is in focus is read as
//! continuing to talk about it.

use std::collections::HashSet;

use serde::Serialize;

use crate::annotation::AnnotatedSentence;
use crate::classify::pronoun::opens_with_pronoun;
use crate::classify::InformativeType;

/// The keyword as the state machine and answer check see it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordContext {
    /// Lowercased keyword text.
    pub text: String,
    /// Lowercased surface forms and lemmas of the keyword's content words.
    pub terms: HashSet<String>,
    pub embedding: Vec<f32>,
}

impl KeywordContext {
    /// Content words are non-stopword, non-punctuation tokens; a keyword made
    /// only of stopwords uses all its non-punctuation tokens.
    pub fn new(sentence: &AnnotatedSentence, embedding: Vec<f32>) -> Self {
        let content: Vec<_> = sentence
            .tokens
            .iter()
            .filter(|t| !t.is_punct && !t.is_stop)
            .collect();
        let chosen: Vec<_> = if content.is_empty() {
            sentence.tokens.iter().filter(|t| !t.is_punct).collect()
        } else {
            content
        };

        let mut terms = HashSet::new();
        for t in chosen {
            terms.insert(t.lower());
            if !t.lemma.is_empty() {
                terms.insert(t.lemma.to_lowercase());
            }
        }
        Self {
            text: sentence.text.to_lowercase(),
            terms,
            embedding,
        }
    }

    /// True when any word of any subject phrase in `sentence` is a keyword term.
    pub fn overlaps_subject(&self, sentence: &AnnotatedSentence) -> bool {
        sentence
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.dep.is_subject())
            .any(|(i, _)| {
                subject_phrase_words(sentence, i)
                    .iter()
                    .any(|w| self.terms.contains(w))
            })
    }
}

/// Lowercased text and lemma of a subject token and its direct
/// compound, modifier and possessive dependents.
pub fn subject_phrase_words(sentence: &AnnotatedSentence, subject: usize) -> Vec<String> {
    let mut words = Vec::new();
    let mut push = |text: &str, lemma: &str| {
        words.push(text.to_lowercase());
        if !lemma.is_empty() {
            words.push(lemma.to_lowercase());
        }
    };
    if let Some(t) = sentence.tokens.get(subject) {
        push(&t.text, &t.lemma);
    }
    for (_, child) in sentence
        .children(subject)
        .filter(|(_, c)| c.dep.is_nominal_modifier())
    {
        push(&child.text, &child.lemma);
    }
    words
}

/// Which transition rule fired for a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// Opening pronoun while active: relevant by context, state unchanged.
    PronounCarry,
    /// Subject overlaps the keyword: relevant by context, state becomes active.
    SubjectOverlap,
    /// Subjects present, none overlapping: state becomes inactive.
    SubjectShift,
    /// No subjects: state unchanged.
    NoSubject,
}

impl Transition {
    pub fn relevant_by_context(self) -> bool {
        matches!(self, Transition::PronounCarry | Transition::SubjectOverlap)
    }
}

/// Whether the keyword is currently in focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceState {
    keyword_active: bool,
}

impl Default for RelevanceState {
    fn default() -> Self {
        Self {
            keyword_active: true,
        }
    }
}

impl RelevanceState {
    /// A fresh state: the keyword starts in focus.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.keyword_active
    }

    /// Advance the state over one sentence and report the rule that fired.
    pub fn step(
        &mut self,
        sentence: &AnnotatedSentence,
        keyword: &KeywordContext,
        opening_pronouns: &HashSet<String>,
    ) -> Transition {
        if self.keyword_active && opens_with_pronoun(sentence, opening_pronouns) {
            return Transition::PronounCarry;
        }
        if keyword.overlaps_subject(sentence) {
            self.keyword_active = true;
            return Transition::SubjectOverlap;
        }
        if sentence.tokens.iter().any(|t| t.dep.is_subject()) {
            self.keyword_active = false;
            return Transition::SubjectShift;
        }
        Transition::NoSubject
    }
}

/// Inputs to the answer-sentence decision for one sentence.
#[derive(Debug, Clone, Copy)]
pub struct AnswerSignals {
    pub informative: InformativeType,
    pub has_verbal: bool,
    pub self_contained: bool,
    pub similarity: f32,
    pub relevant_by_context: bool,
}

/// A sentence answers the keyword when it is substantive, verbal,
/// self-contained and either similar enough or relevant by context.
pub fn is_answer(signals: &AnswerSignals, threshold: f32) -> bool {
    !matches!(
        signals.informative,
        InformativeType::Filler | InformativeType::Question
    ) && signals.has_verbal
        && signals.self_contained
        && (signals.similarity > threshold || signals.relevant_by_context)
}
