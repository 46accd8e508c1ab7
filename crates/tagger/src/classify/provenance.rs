// ABOUTME: Provenance classifier: first, second or third party origin of a factual sentence.
// ABOUTME: Only facts, claims, definitions and statistics are eligible; everything else is Unknown.

use super::{informative, Cascade, InformativeType, Rule, SentenceContext, SourceType};
use crate::annotation::DepRole;

fn is_eligible(c: &SentenceContext<'_>) -> bool {
    matches!(
        c.informative.unwrap_or_else(|| informative::classify(c)),
        InformativeType::Fact
            | InformativeType::Claim
            | InformativeType::Definition
            | InformativeType::Statistic
    )
}

fn first_person_discovery(c: &SentenceContext<'_>) -> bool {
    c.has_first_person_subject() && c.has_lemma_in(&c.lexicon().discovery_lemmas)
}

fn attributed_elsewhere(c: &SentenceContext<'_>) -> bool {
    let lex = c.lexicon();
    !c.has_first_person_subject()
        && (lex.attribution_phrases.is_match(&c.lower) || c.has_lemma_in(&lex.reporting_lemmas))
}

fn regulatory(c: &SentenceContext<'_>) -> bool {
    !c.has_first_person_subject() && c.lexicon().regulatory_keywords.is_match(&c.lower)
}

// The object phrase is the object token plus its possessive modifiers ("our team").
fn direct_interaction(c: &SentenceContext<'_>) -> bool {
    let lex = c.lexicon();
    if !c.has_lemma_in(&lex.interaction_lemmas) {
        return false;
    }
    c.tokens()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.dep.is_object())
        .any(|(i, t)| {
            let mut phrase: Vec<String> = c
                .sentence
                .children(i)
                .filter(|(j, d)| *j < i && d.dep == DepRole::Possessive)
                .map(|(_, d)| d.lower())
                .collect();
            phrase.push(t.lower());
            lex.interaction_objects.contains_word(&t.lower())
                || lex.interaction_objects.contains_word(&phrase.join(" "))
        })
}

fn technical_document(c: &SentenceContext<'_>) -> bool {
    c.lexicon()
        .technical_document
        .as_ref()
        .is_some_and(|re| re.is_match(c.text))
}

pub static CASCADE: Cascade<SourceType> = Cascade {
    rules: &[
        Rule {
            name: "ineligible_type",
            when: |c| !is_eligible(c),
            label: SourceType::Unknown,
        },
        Rule {
            name: "first_person_discovery",
            when: first_person_discovery,
            label: SourceType::FirstParty,
        },
        Rule {
            name: "attribution",
            when: attributed_elsewhere,
            label: SourceType::ThirdParty,
        },
        Rule {
            name: "regulatory",
            when: regulatory,
            label: SourceType::ThirdParty,
        },
        Rule {
            name: "direct_interaction",
            when: direct_interaction,
            label: SourceType::SecondParty,
        },
        Rule {
            name: "technical_document",
            when: technical_document,
            label: SourceType::ThirdParty,
        },
    ],
    default: SourceType::Unknown,
};

pub fn classify(ctx: &SentenceContext<'_>) -> SourceType {
    CASCADE.evaluate(ctx)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::options::TaggerOptions;

    fn source(conllu: &str) -> (SourceType, Option<&'static str>) {
        let s = sent(conllu);
        let ctx = SentenceContext::new(&s, &s.text, &OPTS);
        (classify(&ctx), CASCADE.matching_rule(&ctx).map(|r| r.name))
    }

    #[test]
    fn first_person_discovery_is_first_party() {
        let (label, _) = source(
            "
# text = We tested the app.
1 We     we   PRON PRP _ 2 nsubj _ _
2 tested test VERB VBD _ 0 ROOT  _ _
3 the    the  DET  DT  _ 4 det   _ _
4 app    app  NOUN NN  _ 2 dobj  _ _
5 .      .    PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, SourceType::FirstParty);
    }

    #[test]
    fn regulatory_keyword_is_third_party() {
        let (label, rule) = source(
            "
# text = The filing deadline applies.
1 The      the      DET  DT  _ 3 det      _ _
2 filing   filing   NOUN NN  _ 3 compound _ _
3 deadline deadline NOUN NN  _ 4 nsubj    _ _
4 applies  apply    VERB VBZ _ 0 ROOT     _ _
5 .        .        PUNCT .  _ 4 punct    _ _
",
        );
        assert_eq!(label, SourceType::ThirdParty);
        assert_eq!(rule, Some("regulatory"));
    }

    #[test]
    fn interaction_with_our_team_is_second_party() {
        let (label, rule) = source(
            "
# text = Clients emailed our team.
1 Clients client NOUN NNS _ 2 nsubj _ _
2 emailed email  VERB VBD _ 0 ROOT  _ _
3 our     our    PRON PRP$ _ 4 poss _ _
4 team    team   NOUN NN  _ 2 dobj  _ _
5 .       .      PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, SourceType::SecondParty);
        assert_eq!(rule, Some("direct_interaction"));
    }

    #[test]
    fn technical_standard_is_third_party() {
        let (label, rule) = source(
            "
# text = Passwords follow NIST 800 guidance.
1 Passwords password NOUN  NNS _ 2 nsubj    _ _
2 follow    follow   VERB  VBP _ 0 ROOT     _ _
3 NIST      nist     PROPN NNP _ 5 compound _ _
4 800       800      PROPN NNP _ 5 compound _ _
5 guidance  guidance NOUN  NN  _ 2 dobj     _ _
6 .         .        PUNCT .   _ 2 punct    _ _
",
        );
        assert_eq!(label, SourceType::ThirdParty);
        assert_eq!(rule, Some("technical_document"));
    }

    #[test]
    fn brand_subject_counts_as_first_person() {
        let opts = TaggerOptions {
            brand_terms: vec!["Acme".to_string()],
            ..TaggerOptions::default()
        }
        .compile()
        .unwrap();
        let s = sent(
            "
# text = Acme measured the gap.
1 Acme     acme    PROPN NNP _ 2 nsubj _ _
2 measured measure VERB  VBD _ 0 ROOT  _ _
3 the      the     DET   DT  _ 4 det   _ _
4 gap      gap     NOUN  NN  _ 2 dobj  _ _
5 .        .       PUNCT .   _ 2 punct _ _
",
        );
        let ctx = SentenceContext::new(&s, &s.text, &opts);
        assert_eq!(classify(&ctx), SourceType::FirstParty);
    }

    #[test]
    fn questions_are_unknown() {
        let (label, rule) = source(
            "
# text = Who files?
1 Who   who  PRON WP  _ 2 nsubj _ _
2 files file VERB VBZ _ 0 ROOT  _ _
3 ?     ?    PUNCT .  _ 2 punct _ _
",
        );
        assert_eq!(label, SourceType::Unknown);
        assert_eq!(rule, Some("ineligible_type"));
    }
}
