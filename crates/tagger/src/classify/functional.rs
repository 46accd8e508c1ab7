// ABOUTME: Functional type classifier (declarative, interrogative, exclamatory, imperative).

use super::{Cascade, FunctionalType, Rule, SentenceContext};
use crate::annotation::PartOfSpeech;

pub static CASCADE: Cascade<FunctionalType> = Cascade {
    rules: &[
        Rule {
            name: "ends_with_question",
            when: |c| c.text.ends_with('?'),
            label: FunctionalType::Interrogative,
        },
        Rule {
            name: "ends_with_exclamation",
            when: |c| c.text.ends_with('!'),
            label: FunctionalType::Exclamatory,
        },
        Rule {
            name: "bare_verb_root",
            when: |c| {
                c.sentence
                    .root()
                    .is_some_and(|r| r.tag == "VB" && r.pos == PartOfSpeech::Verb)
            },
            label: FunctionalType::Imperative,
        },
    ],
    default: FunctionalType::Declarative,
};

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn classify(conllu: &str) -> FunctionalType {
        let s = sent(conllu);
        CASCADE.evaluate(&SentenceContext::new(&s, &s.text, &OPTS))
    }

    #[test]
    fn question_mark_wins() {
        let label = classify(
            "
# text = Is this correct?
1 Is      be      AUX  VBZ _ 0 ROOT  _ _
2 this    this    PRON DT  _ 1 nsubj _ _
3 correct correct ADJ  JJ  _ 1 acomp _ _
4 ?       ?       PUNCT . _ 1 punct _ _
",
        );
        assert_eq!(label, FunctionalType::Interrogative);
    }

    #[test]
    fn bare_verb_root_is_imperative() {
        let label = classify(
            "
# text = File your return early.
1 File   file   VERB VB   _ 0 ROOT  _ _
2 your   your   PRON PRP$ _ 3 poss  _ _
3 return return NOUN NN   _ 1 dobj  _ _
4 early  early  ADV  RB   _ 1 advmod _ _
5 .      .      PUNCT .   _ 1 punct _ _
",
        );
        assert_eq!(label, FunctionalType::Imperative);
    }

    #[test]
    fn auxiliary_root_is_not_imperative() {
        let label = classify(
            "
# text = Be careful.
1 Be      be      AUX VB _ 0 ROOT  _ _
2 careful careful ADJ JJ _ 1 acomp _ _
3 .       .       PUNCT . _ 1 punct _ _
",
        );
        assert_eq!(label, FunctionalType::Declarative);
    }

    #[test]
    fn plain_statement_is_declarative() {
        let label = classify(
            "
# text = Taxes rose.
1 Taxes tax  NOUN NNS _ 2 nsubj _ _
2 rose  rise VERB VBD _ 0 ROOT  _ _
3 .     .    PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, FunctionalType::Declarative);
    }

    #[test]
    fn rule_order_is_stable() {
        assert_eq!(
            CASCADE.rule_names(),
            vec!["ends_with_question", "ends_with_exclamation", "bare_verb_root"]
        );
    }
}
