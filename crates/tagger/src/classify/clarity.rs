// ABOUTME: Clarity classifier: how easily a sentence can be lifted out as a standalone answer.
// ABOUTME: Reads structure, voice and informative type from the context; thresholds come from options.

use super::{
    informative, structure, Cascade, ClarityType, InformativeType, Rule, SentenceContext,
    Structure, Voice,
};

fn structure_of(c: &SentenceContext<'_>) -> Structure {
    c.structure.unwrap_or_else(|| structure::classify_structure(c))
}

fn voice_of(c: &SentenceContext<'_>) -> Voice {
    c.voice.unwrap_or_else(|| structure::VOICE.evaluate(c))
}

fn informative_of(c: &SentenceContext<'_>) -> InformativeType {
    c.informative.unwrap_or_else(|| informative::classify(c))
}

fn modifier_count(c: &SentenceContext<'_>) -> usize {
    c.tokens().iter().filter(|t| t.pos.is_modifier()).count()
}

fn modifier_ratio(c: &SentenceContext<'_>) -> f32 {
    let words = c.sentence.word_count();
    if words == 0 {
        return 0.0;
    }
    modifier_count(c) as f32 / words as f32
}

fn average_depth(c: &SentenceContext<'_>) -> f32 {
    let tokens = c.tokens();
    if tokens.is_empty() {
        return 0.0;
    }
    tokens.iter().map(|t| t.depth).sum::<usize>() as f32 / tokens.len() as f32
}

pub static CASCADE: Cascade<ClarityType> = Cascade {
    rules: &[
        Rule {
            name: "filler_or_fragment",
            when: |c| {
                informative_of(c) == InformativeType::Filler
                    || structure_of(c) == Structure::Fragment
            },
            label: ClarityType::UnIndexable,
        },
        Rule {
            name: "deictic_phrase",
            when: |c| c.lexicon().deictic_phrases.is_match(&c.lower),
            label: ClarityType::UnIndexable,
        },
        Rule {
            name: "too_long",
            when: |c| c.sentence.word_count() > c.opts.raw.clarity.low_clarity_max_tokens,
            label: ClarityType::LowClarity,
        },
        Rule {
            name: "modifier_burst",
            when: |c| {
                let t = &c.opts.raw.clarity;
                c.sentence.word_count() > t.modifier_burst_min_tokens
                    && modifier_count(c) > t.modifier_burst_count
            },
            label: ClarityType::LowClarity,
        },
        Rule {
            name: "modifier_heavy",
            when: |c| modifier_ratio(c) > c.opts.raw.clarity.max_modifier_ratio,
            label: ClarityType::LowClarity,
        },
        Rule {
            name: "deeply_nested",
            when: |c| average_depth(c) > c.opts.raw.clarity.max_average_depth,
            label: ClarityType::LowClarity,
        },
        Rule {
            name: "short_active_simple",
            when: |c| {
                voice_of(c) == Voice::Active
                    && matches!(structure_of(c), Structure::Simple | Structure::Compound)
                    && c.sentence.word_count() < c.opts.raw.clarity.focused_max_tokens
            },
            label: ClarityType::Focused,
        },
    ],
    default: ClarityType::ModerateComplexity,
};
