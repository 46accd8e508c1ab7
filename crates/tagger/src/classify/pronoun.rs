// ABOUTME: Pronoun presence and self-containment checks.
// ABOUTME: An opening pronoun only breaks self-containment when the keyword context is inactive.

use std::collections::HashSet;

use super::SentenceContext;
use crate::annotation::AnnotatedSentence;

/// Penn tags for personal, possessive and wh- pronouns.
pub const PRONOUN_TAGS: &[&str] = &["PRP", "PRP$", "WP", "WDT"];

/// How many leading tokens are inspected for an opening pronoun.
pub const OPENING_WINDOW: usize = 2;

pub fn has_pronoun(ctx: &SentenceContext<'_>) -> bool {
    ctx.tokens()
        .iter()
        .any(|t| PRONOUN_TAGS.contains(&t.tag.as_str()))
}

/// True when one of the first two tokens is in `pronouns` (lowercased).
pub fn opens_with_pronoun(sentence: &AnnotatedSentence, pronouns: &HashSet<String>) -> bool {
    sentence
        .tokens
        .iter()
        .take(OPENING_WINDOW)
        .any(|t| pronouns.contains(&t.lower()))
}

/// A sentence is self-contained unless it leans on text around it.
pub fn is_self_contained(ctx: &SentenceContext<'_>) -> bool {
    let lex = ctx.lexicon();
    let dangling_opener = opens_with_pronoun(ctx.sentence, &lex.opening_pronouns) && !ctx.keyword_active;
    let cross_reference = lex.reference_phrases.is_match(&ctx.lower);
    !(dangling_opener || cross_reference)
}
