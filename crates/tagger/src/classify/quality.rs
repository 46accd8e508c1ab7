// ABOUTME: Info quality classifier: well known, attributed, original or false information.

use super::{Cascade, InfoQuality, Rule, SentenceContext};
use crate::annotation::EntityKind;

const WELL_KNOWN_ENTITIES: &[EntityKind] = &[
    EntityKind::Organization,
    EntityKind::GeopoliticalEntity,
    EntityKind::Law,
    EntityKind::Date,
];

pub static CASCADE: Cascade<InfoQuality> = Cascade {
    rules: &[
        Rule {
            name: "absolute_wording",
            when: |c| {
                c.opts.raw.flag_absolute_claims && c.lexicon().absolute_phrases.is_match(&c.lower)
            },
            label: InfoQuality::False,
        },
        Rule {
            name: "attribution",
            when: |c| c.lexicon().attribution_phrases.is_match(&c.lower),
            label: InfoQuality::Derived,
        },
        Rule {
            name: "first_person",
            when: |c| {
                let markers = &c.lexicon().first_person_markers;
                c.tokens().iter().any(|t| markers.contains(&t.lower()))
            },
            label: InfoQuality::Unique,
        },
        Rule {
            name: "well_known_entity",
            when: |c| c.sentence.has_entity(WELL_KNOWN_ENTITIES),
            label: InfoQuality::WellKnown,
        },
    ],
    default: InfoQuality::PartiallyKnown,
};

pub fn classify(ctx: &SentenceContext<'_>) -> InfoQuality {
    CASCADE.evaluate(ctx)
}
