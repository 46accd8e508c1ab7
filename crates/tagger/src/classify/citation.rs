// ABOUTME: Citation classifier: does the sentence name a source for what it claims.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Cascade, Rule, SentenceContext};
use crate::annotation::{EntityKind, PartOfSpeech};

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://\S+|www\.\S+").expect("URL pattern is valid")
});

const SOURCE_ENTITIES: &[EntityKind] = &[
    EntityKind::Person,
    EntityKind::Organization,
    EntityKind::GeopoliticalEntity,
];

fn has_number(c: &SentenceContext<'_>) -> bool {
    c.tokens().iter().any(|t| {
        t.pos == PartOfSpeech::Numeral
            || matches!(
                t.entity,
                Some(EntityKind::Cardinal | EntityKind::Percent | EntityKind::Money)
            )
    })
}

pub static CASCADE: Cascade<bool> = Cascade {
    rules: &[
        Rule {
            name: "first_person_source",
            when: |c| c.lexicon().first_person_source_phrases.is_match(&c.lower),
            label: true,
        },
        Rule {
            name: "attribution",
            when: |c| c.lexicon().attribution_phrases.is_match(&c.lower),
            label: true,
        },
        Rule {
            name: "hyperlink",
            when: |c| URL.is_match(c.text),
            label: true,
        },
        Rule {
            name: "bare_numeric_claim",
            when: has_number,
            label: false,
        },
        Rule {
            name: "reported_by_entity",
            when: |c| {
                c.has_lemma_in(&c.lexicon().reporting_lemmas)
                    && c.sentence.has_entity(SOURCE_ENTITIES)
            },
            label: true,
        },
    ],
    default: false,
};

pub fn classify(ctx: &SentenceContext<'_>) -> bool {
    CASCADE.evaluate(ctx)
}
