// ABOUTME: Entity mention summary: deduplicated salient entities, their count and a confidence flag.

use serde::{Deserialize, Serialize};

use super::SentenceContext;
use crate::annotation::EntityKind;

/// Entity labels that count as salient mentions.
pub const SALIENT: &[EntityKind] = &[
    EntityKind::Organization,
    EntityKind::Product,
    EntityKind::Law,
    EntityKind::Norp,
    EntityKind::Facility,
    EntityKind::Percent,
    EntityKind::Money,
    EntityKind::GeopoliticalEntity,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Distinct entity texts in first-seen order.
    pub entities: Vec<String>,
    /// Entities present and no hedging word in the sentence.
    pub confident: bool,
}

impl EntitySummary {
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_mentioned(&self) -> bool {
        !self.entities.is_empty()
    }
}

pub fn summarize(ctx: &SentenceContext<'_>) -> EntitySummary {
    let mut entities: Vec<String> = Vec::new();
    for span in &ctx.sentence.entities {
        if SALIENT.contains(&span.label) && !entities.contains(&span.text) {
            entities.push(span.text.clone());
        }
    }
    let confident = !entities.is_empty() && !ctx.lexicon().hedge_words.is_match(&ctx.lower);
    EntitySummary {
        entities,
        confident,
    }
}
