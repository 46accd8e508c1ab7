// ABOUTME: Informative type classifier: what kind of information a sentence carries.
// ABOUTME: A thirteen-rule priority cascade from questions and noise down to plain claims.

use super::{Cascade, InformativeType, Rule, SentenceContext};
use crate::annotation::{DepRole, EntityKind, PartOfSpeech};

const STATISTIC_ENTITIES: &[EntityKind] =
    &[EntityKind::Percent, EntityKind::Money, EntityKind::Quantity];

const FACT_ENTITIES: &[EntityKind] = &[
    EntityKind::Date,
    EntityKind::Organization,
    EntityKind::GeopoliticalEntity,
    EntityKind::Law,
];

fn is_question(c: &SentenceContext<'_>) -> bool {
    if c.text.ends_with('?') {
        return true;
    }
    c.tokens()
        .iter()
        .find(|t| !t.is_punct)
        .is_some_and(|t| c.lexicon().question_openers.contains(&t.lower()))
}

fn is_copular_definition(c: &SentenceContext<'_>) -> bool {
    let Some(root) = c.sentence.root_index() else {
        return false;
    };
    c.tokens()[root].lemma == "be"
        && c.sentence.children(root).any(|(_, t)| t.dep == DepRole::Attribute)
}

fn has_numeric_statistic(c: &SentenceContext<'_>) -> bool {
    if c.sentence.has_entity(STATISTIC_ENTITIES) {
        return true;
    }
    c.tokens().iter().any(|t| {
        t.pos == PartOfSpeech::Numeral
            && !matches!(t.entity, Some(EntityKind::Date) | Some(EntityKind::Time))
    })
}

pub static CASCADE: Cascade<InformativeType> = Cascade {
    rules: &[
        Rule {
            name: "near_empty",
            when: |c| c.is_near_empty(),
            label: InformativeType::Filler,
        },
        Rule {
            name: "question_marker",
            when: is_question,
            label: InformativeType::Question,
        },
        Rule {
            name: "noise_prefix",
            when: |c| c.lexicon().noise_prefixes.is_prefix_of(c.text),
            label: InformativeType::Filler,
        },
        Rule {
            name: "imperative_or_suggestion",
            when: |c| {
                c.sentence.root().is_some_and(|r| r.tag == "VB")
                    || c.lexicon().suggestion_phrases.is_match(&c.lower)
            },
            label: InformativeType::Suggestion,
        },
        Rule {
            name: "definition",
            when: |c| {
                c.lexicon().definition_phrases.is_match(&c.lower) || is_copular_definition(c)
            },
            label: InformativeType::Definition,
        },
        Rule {
            name: "future_marker",
            when: |c| c.lexicon().prediction_phrases.is_match(&c.lower),
            label: InformativeType::Prediction,
        },
        Rule {
            name: "hedge",
            when: |c| c.lexicon().hedge_words.is_match(&c.lower),
            label: InformativeType::Uncertain,
        },
        Rule {
            name: "numeric",
            when: has_numeric_statistic,
            label: InformativeType::Statistic,
        },
        Rule {
            name: "factual_entity",
            when: |c| c.sentence.has_entity(FACT_ENTITIES),
            label: InformativeType::Fact,
        },
        Rule {
            name: "short_verbless",
            when: |c| {
                c.sentence.word_count() < c.opts.raw.filler_max_tokens && !c.sentence.has_verbal()
            },
            label: InformativeType::Filler,
        },
        Rule {
            name: "transition_opener",
            when: |c| c.lexicon().transition_openers.starts(c.text),
            label: InformativeType::Transition,
        },
        Rule {
            name: "opinion_marker",
            when: |c| c.lexicon().opinion_phrases.is_match(&c.lower),
            label: InformativeType::Opinion,
        },
        Rule {
            name: "observation_marker",
            when: |c| c.lexicon().observation_phrases.is_match(&c.lower),
            label: InformativeType::Observation,
        },
    ],
    default: InformativeType::Claim,
};

pub fn classify(ctx: &SentenceContext<'_>) -> InformativeType {
    CASCADE.evaluate(ctx)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn classify_text(conllu: &str) -> (InformativeType, Option<&'static str>) {
        let s = sent(conllu);
        let ctx = SentenceContext::new(&s, &s.text, &OPTS);
        (classify(&ctx), CASCADE.matching_rule(&ctx).map(|r| r.name))
    }

    #[test]
    fn question_by_opener_without_mark() {
        let (label, _) = classify_text(
            "
# text = How to file taxes.
1 How   how  SCONJ WRB _ 3 advmod _ _
2 to    to   PART TO   _ 3 aux    _ _
3 file  file VERB VB   _ 0 ROOT   _ _
4 taxes tax  NOUN NNS  _ 3 dobj   _ _
5 .     .    PUNCT .   _ 3 punct  _ _
",
        );
        assert_eq!(label, InformativeType::Question);
    }

    #[test]
    fn subordinate_when_clause_is_not_a_question() {
        let (label, rule) = classify_text(
            "
# text = When you file early, the refund arrives sooner.
1 When    when    SCONJ WRB _ 3 advmod _ _
2 you     you     PRON  PRP _ 3 nsubj  _ _
3 file    file    VERB  VBP _ 8 advcl  _ _
4 early   early   ADV   RB  _ 3 advmod _ _
5 ,       ,       PUNCT ,   _ 8 punct  _ _
6 the     the     DET   DT  _ 7 det    _ _
7 refund  refund  NOUN  NN  _ 8 nsubj  _ _
8 arrives arrive  VERB  VBZ _ 0 ROOT   _ _
9 sooner  soon    ADV   RBR _ 8 advmod _ _
10 .      .       PUNCT .   _ 8 punct  _ _
",
        );
        assert_ne!(label, InformativeType::Question);
        assert_eq!(rule, None);
    }

    #[test]
    fn noise_prefix_is_filler() {
        let (label, rule) = classify_text(
            "
# text = Meta title: Tax guide.
1 Meta  meta  PROPN NNP _ 2 compound _ _
2 title title NOUN  NN  _ 0 ROOT     _ _
3 :     :     PUNCT :   _ 2 punct    _ _
4 Tax   tax   NOUN  NN  _ 5 compound _ _
5 guide guide NOUN  NN  _ 2 appos    _ _
6 .     .     PUNCT .   _ 2 punct    _ _
",
        );
        assert_eq!(label, InformativeType::Filler);
        assert_eq!(rule, Some("noise_prefix"));
    }

    #[test]
    fn copular_attribute_is_definition() {
        let (label, rule) = classify_text(
            "
# text = A W-2 is a wage statement.
1 A         a         DET  DT  _ 2 det   _ _
2 W-2       w-2       PROPN NNP _ 3 nsubj _ _
3 is        be        AUX  VBZ _ 0 ROOT  _ _
4 a         a         DET  DT  _ 6 det   _ _
5 wage      wage      NOUN NN  _ 6 compound _ _
6 statement statement NOUN NN  _ 3 attr  _ _
7 .         .         PUNCT .  _ 3 punct _ _
",
        );
        assert_eq!(label, InformativeType::Definition);
        assert_eq!(rule, Some("definition"));
    }

    #[test]
    fn modal_future_is_prediction() {
        let (label, rule) = classify_text(
            "
# text = Rates are likely to rise.
1 Rates  rate   NOUN NNS _ 2 nsubj _ _
2 are    be     AUX  VBP _ 0 ROOT  _ _
3 likely likely ADJ  JJ  _ 2 acomp _ _
4 to     to     PART TO  _ 5 aux   _ _
5 rise   rise   VERB VB  _ 3 xcomp _ _
6 .      .      PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, InformativeType::Prediction);
        assert_eq!(rule, Some("future_marker"));
    }

    #[test]
    fn numeral_outside_date_is_statistic() {
        let (label, _) = classify_text(
            "
# text = About 40 firms filed late.
1 About about ADV  RB  _ 2 advmod _ _
2 40    40    NUM  CD  _ 3 nummod _ _
3 firms firm  NOUN NNS _ 4 nsubj  _ _
4 filed file  VERB VBD _ 0 ROOT   _ _
5 late  late  ADV  RB  _ 4 advmod _ _
6 .     .     PUNCT .  _ 4 punct  _ _
",
        );
        assert_eq!(label, InformativeType::Statistic);
    }

    #[test]
    fn date_numeral_is_fact_not_statistic() {
        let (label, rule) = classify_text(
            "
# text = The law changed in 2021.
1 The     the    DET  DT  _ 2 det   _ _
2 law     law    NOUN NN  _ 3 nsubj _ _
3 changed change VERB VBD _ 0 ROOT  _ _
4 in      in     ADP  IN  _ 3 prep  _ _
5 2021    2021   NUM  CD  _ 4 pobj  _ NE=DATE
6 .       .      PUNCT .  _ 3 punct _ _
",
        );
        assert_eq!(label, InformativeType::Fact);
        assert_eq!(rule, Some("factual_entity"));
    }

    #[test]
    fn short_verbless_is_filler() {
        let (label, rule) = classify_text(
            "
# text = Great news.
1 Great great ADJ  JJ _ 2 amod _ _
2 news  news  NOUN NN _ 0 ROOT _ _
3 .     .     PUNCT . _ 2 punct _ _
",
        );
        assert_eq!(label, InformativeType::Filler);
        assert_eq!(rule, Some("short_verbless"));
    }

    #[test]
    fn transition_then_opinion_then_claim() {
        let (label, _) = classify_text(
            "
# text = However, the fee applies.
1 However however ADV  RB  _ 5 advmod _ _
2 ,       ,       PUNCT ,  _ 5 punct  _ _
3 the     the     DET  DT  _ 4 det    _ _
4 fee     fee     NOUN NN  _ 5 nsubj  _ _
5 applies apply   VERB VBZ _ 0 ROOT   _ _
6 .       .       PUNCT .  _ 5 punct  _ _
",
        );
        assert_eq!(label, InformativeType::Transition);

        let (label, _) = classify_text(
            "
# text = We believe the fee is fair.
1 We      we      PRON PRP _ 2 nsubj _ _
2 believe believe VERB VBP _ 0 ROOT  _ _
3 the     the     DET  DT  _ 4 det   _ _
4 fee     fee     NOUN NN  _ 5 nsubj _ _
5 is      be      AUX  VBZ _ 2 ccomp _ _
6 fair    fair    ADJ  JJ  _ 5 acomp _ _
7 .       .       PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, InformativeType::Opinion);

        let (label, rule) = classify_text(
            "
# text = The fee applies.
1 The     the   DET  DT  _ 2 det   _ _
2 fee     fee   NOUN NN  _ 3 nsubj _ _
3 applies apply VERB VBZ _ 0 ROOT  _ _
4 .       .     PUNCT .  _ 3 punct _ _
",
        );
        assert_eq!(label, InformativeType::Claim);
        assert_eq!(rule, None);
    }
}
