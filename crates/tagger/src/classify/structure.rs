// ABOUTME: Clause structure and voice classifiers, both driven by dependency relations.
// ABOUTME: Independent clauses are verbal roots and verbal conjuncts; dependent ones are clausal relations.

use super::{Cascade, Rule, SentenceContext, Structure, Voice};
use crate::annotation::{AnnotatedSentence, DepRole};

/// Independent and dependent clause counts for a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClauseCounts {
    pub independent: usize,
    pub dependent: usize,
}

/// Count clauses. A lone subordinating marker counts as one dependent clause.
pub fn clause_counts(sentence: &AnnotatedSentence) -> ClauseCounts {
    let tokens = &sentence.tokens;
    let roots = tokens
        .iter()
        .filter(|t| t.dep == DepRole::Root && t.pos.is_verbal())
        .count();
    let conjuncts = tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            t.dep == DepRole::Conjunct
                && sentence.head_of(*i).is_some_and(|h| h.pos.is_verbal())
        })
        .count();

    let mut dependent = tokens.iter().filter(|t| t.dep.is_dependent_clause()).count();
    if dependent == 0 && tokens.iter().any(|t| t.dep == DepRole::Marker) {
        dependent = 1;
    }

    ClauseCounts {
        independent: roots + conjuncts,
        dependent,
    }
}

fn counts(c: &SentenceContext<'_>) -> ClauseCounts {
    clause_counts(c.sentence)
}

pub static STRUCTURE: Cascade<Structure> = Cascade {
    rules: &[
        Rule {
            name: "no_verb",
            when: |c| c.is_near_empty() || !c.sentence.has_verbal(),
            label: Structure::Fragment,
        },
        Rule {
            name: "two_independent_with_dependent",
            when: |c| {
                let n = counts(c);
                n.independent >= 2 && n.dependent >= 1
            },
            label: Structure::CompoundComplex,
        },
        Rule {
            name: "independent_with_dependent",
            when: |c| {
                let n = counts(c);
                n.independent >= 1 && n.dependent >= 1
            },
            label: Structure::Complex,
        },
        Rule {
            name: "two_independent",
            when: |c| counts(c).independent >= 2,
            label: Structure::Compound,
        },
        Rule {
            name: "one_independent",
            when: |c| counts(c).independent == 1,
            label: Structure::Simple,
        },
    ],
    default: Structure::Fragment,
};

pub fn classify_structure(ctx: &SentenceContext<'_>) -> Structure {
    STRUCTURE.evaluate(ctx)
}

pub static VOICE: Cascade<Voice> = Cascade {
    rules: &[
        Rule {
            name: "passive_auxiliary",
            when: |c| c.tokens().iter().any(|t| t.dep == DepRole::PassiveAuxiliary),
            label: Voice::Passive,
        },
        Rule {
            name: "passive_subject",
            when: |c| {
                c.tokens().iter().any(|t| {
                    matches!(
                        t.dep,
                        DepRole::PassiveNominalSubject | DepRole::PassiveClausalSubject
                    )
                })
            },
            label: Voice::Passive,
        },
    ],
    default: Voice::Active,
};
