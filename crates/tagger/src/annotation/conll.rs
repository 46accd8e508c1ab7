// ABOUTME: CoNLL-U reader that turns dependency-annotated sentences into AnnotatedSentence values.
// ABOUTME: Entities ride in the MISC column as NE=<label>; stopwords come from MISC or a builtin list.

//! CoNLL-U interchange.
//!
//! Columns are `ID FORM LEMMA UPOS XPOS FEATS HEAD DEPREL DEPS MISC`. Columns
//! may be separated by tabs or runs of spaces (forms never contain spaces).
//! `HEAD` is 1-based with 0 for the root. Multiword ranges (`1-2`) and empty
//! nodes (`1.1`) are skipped. Sentences are separated by blank lines; a
//! `# text = ...` comment supplies the raw text, otherwise forms are joined.
//!
//! Recognized MISC keys: `NE=ORG` (consecutive tokens with the same label
//! form one span), `Stop=Yes|No`, `Vector=No`.

use anyhow::anyhow;

use super::spacy::{map_dep, map_entity, map_pos, parse_morph};
use super::{compute_depths, AnnotatedSentence, AnnotatedToken, EntityKind, EntitySpan, PartOfSpeech};
use crate::error::{Result, TaggerError};

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "but", "by", "can", "could", "did", "do", "does", "each", "for", "from",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "may", "me", "might", "more", "most", "my", "no", "not", "of", "on",
    "only", "or", "other", "our", "ours", "out", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to",
    "too", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which", "who",
    "why", "will", "with", "would", "you", "your",
];

/// True for common English function words.
pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.binary_search(&lower.as_str()).is_ok()
}

/// Parse every sentence in a CoNLL-U document.
pub fn parse_conllu(src: &str) -> Result<Vec<AnnotatedSentence>> {
    let mut sentences = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in src.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !block.is_empty() {
                sentences.push(parse_block(&block)?);
                block.clear();
            }
            continue;
        }
        block.push(line);
    }
    Ok(sentences)
}

/// Parse a document expected to hold exactly one sentence.
pub fn parse_sentence(src: &str) -> Result<AnnotatedSentence> {
    let mut all = parse_conllu(src)?;
    if all.len() != 1 {
        return Err(TaggerError::annotation(
            "parse conllu",
            src,
            Some(anyhow!("expected one sentence, found {}", all.len())),
        ));
    }
    Ok(all.remove(0))
}

struct Row<'a> {
    form: &'a str,
    lemma: &'a str,
    upos: &'a str,
    xpos: &'a str,
    feats: &'a str,
    head: usize,
    deprel: &'a str,
    misc: &'a str,
}

fn parse_block(lines: &[&str]) -> Result<AnnotatedSentence> {
    let mut text: Option<String> = None;
    let mut rows = Vec::new();

    for line in lines {
        let line = line.trim();
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(t) = comment.trim().strip_prefix("text =") {
                text = Some(t.trim().to_string());
            }
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 8 {
            return Err(TaggerError::annotation(
                "parse conllu",
                line.to_string(),
                Some(anyhow!("expected at least 8 columns, found {}", cols.len())),
            ));
        }
        if cols[0].contains('-') || cols[0].contains('.') {
            continue;
        }
        let head: usize = cols[6].parse().map_err(|e: std::num::ParseIntError| {
            TaggerError::annotation("parse conllu head", line.to_string(), Some(e.into()))
        })?;
        rows.push(Row {
            form: cols[1],
            lemma: cols[2],
            upos: cols[3],
            xpos: cols[4],
            feats: cols[5],
            head,
            deprel: cols[7],
            misc: cols.get(9).copied().unwrap_or("_"),
        });
    }

    let mut tokens: Vec<AnnotatedToken> = Vec::with_capacity(rows.len());
    let mut labels: Vec<Option<EntityKind>> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let misc = misc_map(row.misc);
        let pos = map_pos(row.upos);
        let is_punct = pos == PartOfSpeech::Punctuation;
        let entity = misc.iter().find(|(k, _)| *k == "NE").and_then(|(_, v)| map_entity(v));
        let is_stop = match misc.iter().find(|(k, _)| *k == "Stop") {
            Some((_, v)) => v.eq_ignore_ascii_case("yes"),
            None => is_stopword(row.form),
        };
        let has_vector = !is_punct && !misc.iter().any(|(k, v)| *k == "Vector" && *v == "No");

        labels.push(entity);
        tokens.push(AnnotatedToken {
            text: row.form.to_string(),
            lemma: if row.lemma == "_" {
                row.form.to_lowercase()
            } else {
                row.lemma.to_lowercase()
            },
            pos,
            tag: if row.xpos == "_" { String::new() } else { row.xpos.to_string() },
            dep: map_dep(row.deprel),
            head: if row.head == 0 { i } else { row.head - 1 },
            is_stop,
            is_punct,
            entity,
            morph: if row.feats == "_" { Default::default() } else { parse_morph(row.feats) },
            depth: 0,
            has_vector,
        });
    }
    compute_depths(&mut tokens);

    let entities = entity_spans(&tokens, &labels);
    let text = text.unwrap_or_else(|| join_forms(&tokens));
    Ok(AnnotatedSentence {
        text,
        tokens,
        entities,
        embedding: None,
    })
}

fn misc_map(misc: &str) -> Vec<(&str, &str)> {
    if misc == "_" {
        return Vec::new();
    }
    misc.split('|').filter_map(|kv| kv.split_once('=')).collect()
}

fn entity_spans(tokens: &[AnnotatedToken], labels: &[Option<EntityKind>]) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = Vec::new();
    let mut i = 0;
    while i < labels.len() {
        let Some(label) = labels[i] else {
            i += 1;
            continue;
        };
        let start = i;
        while i < labels.len() && labels[i] == Some(label) {
            i += 1;
        }
        spans.push(EntitySpan {
            start,
            end: i,
            label,
            text: join_forms(&tokens[start..i]),
        });
    }
    spans
}

fn join_forms(tokens: &[AnnotatedToken]) -> String {
    let mut out = String::new();
    for (i, t) in tokens.iter().enumerate() {
        let glue = t.is_punct && !matches!(t.text.as_str(), "(" | "[" | "\"" | "“");
        if i > 0 && !glue {
            out.push(' ');
        }
        out.push_str(&t.text);
    }
    out
}
