// ABOUTME: Grammaticality signal: structural heuristics over the annotation, or an external checker.
// ABOUTME: The heuristic is a cascade of failure rules; passing every one means correct.

use super::{Cascade, Rule, SentenceContext, MIN_TEXT_CHARS};
use crate::annotation::{GrammarChecker, PartOfSpeech};
use crate::error::Result;

const TERMINAL_PUNCTUATION: &[char] = &['.', '?', '!', '"'];

fn lacks_verbal_root(c: &SentenceContext<'_>) -> bool {
    !c.sentence.root().is_some_and(|r| r.pos.is_verbal())
}

fn number_disagreement(c: &SentenceContext<'_>) -> bool {
    c.tokens().iter().enumerate().any(|(i, t)| {
        if !t.dep.is_subject() {
            return false;
        }
        let Some(subject_number) = t.morph.number else {
            return false;
        };
        c.sentence
            .head_of(i)
            .and_then(|verb| verb.morph.number)
            .is_some_and(|verb_number| verb_number != subject_number)
    })
}

fn bare_verb_after_copula(c: &SentenceContext<'_>) -> bool {
    c.tokens().windows(2).any(|pair| {
        pair[0].pos == PartOfSpeech::Auxiliary && pair[0].lemma == "be" && pair[1].tag == "VB"
    })
}

fn starts_lowercase(c: &SentenceContext<'_>) -> bool {
    let stripped = c.opts.list_prefix.replace(c.text, "");
    stripped
        .chars()
        .next()
        .is_some_and(|ch| ch.is_alphabetic() && !ch.is_uppercase())
}

fn missing_terminal(c: &SentenceContext<'_>) -> bool {
    !c.text.ends_with(TERMINAL_PUNCTUATION)
}

pub static HEURISTIC: Cascade<bool> = Cascade {
    rules: &[
        Rule {
            name: "too_short",
            when: |c| c.text.chars().count() < MIN_TEXT_CHARS,
            label: false,
        },
        Rule {
            name: "no_verbal_root",
            when: lacks_verbal_root,
            label: false,
        },
        Rule {
            name: "subject_verb_number",
            when: number_disagreement,
            label: false,
        },
        Rule {
            name: "bare_verb_after_copula",
            when: bare_verb_after_copula,
            label: false,
        },
        Rule {
            name: "lowercase_start",
            when: starts_lowercase,
            label: false,
        },
        Rule {
            name: "missing_terminal_punctuation",
            when: missing_terminal,
            label: false,
        },
    ],
    default: true,
};

/// Heuristic grammar signal.
pub fn is_grammatical(ctx: &SentenceContext<'_>) -> bool {
    HEURISTIC.evaluate(ctx)
}

/// Grammar signal from an external checker: zero issues means correct.
///
/// Texts below the minimum length are incorrect without a provider call.
pub fn check_with(checker: &dyn GrammarChecker, text: &str) -> Result<bool> {
    let text = text.trim();
    if text.chars().count() < MIN_TEXT_CHARS {
        return Ok(false);
    }
    Ok(checker.check(text)?.is_empty())
}
