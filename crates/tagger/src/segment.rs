// ABOUTME: Turns HTML block elements into an ordered list of sentences with tag and paragraph ids.
// ABOUTME: Handles nesting, exact-text dedup, table rows, list-pointer merging and byte decoding.

//! Segmentation and merge engine.
//!
//! Blocks are processed in document order. Only outermost block-level
//! elements count, a block whose text was already seen is skipped, and list
//! pointers that the sentence splitter cut off ("i.", "3)") are glued back
//! onto the sentence they introduce.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::annotation::Annotator;
use crate::error::Result;
use crate::options::CompiledOptions;

/// Tags treated as block-level.
pub const BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "td", "th"];

/// Table row tag, block-level only when row merging is enabled.
pub const ROW_TAG: &str = "tr";

static ANY_ELEMENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("*").expect("universal selector is valid"));

/// One block element as extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub tag: String,
    pub text: String,
    /// Ancestor tag names, nearest first.
    #[serde(default)]
    pub parent_tags: Vec<String>,
    /// Cell texts for table rows.
    #[serde(default)]
    pub cells: Vec<String>,
}

impl Block {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_parents(mut self, parents: &[&str]) -> Self {
        self.parent_tags = parents.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// A sentence ready for classification, with its document placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentedSentence {
    pub id: String,
    pub text: String,
    pub html_tag: String,
    pub paragraph_id: String,
}

pub fn is_block_tag(tag: &str, merge_rows: bool) -> bool {
    let tag = tag.to_ascii_lowercase();
    BLOCK_TAGS.contains(&tag.as_str()) || (merge_rows && tag == ROW_TAG)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn block_text(block: &Block, opts: &CompiledOptions) -> String {
    if block.tag.eq_ignore_ascii_case(ROW_TAG) && !block.cells.is_empty() {
        return block
            .cells
            .iter()
            .map(|c| normalize_whitespace(c))
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(&opts.raw.cell_separator);
    }
    normalize_whitespace(&block.text)
}

/// Re-join list pointers with the sentence that follows them.
///
/// A pointer with nothing after it is kept as its own sentence.
pub fn merge_pointers(sentences: Vec<String>, pointer: &Regex) -> Vec<String> {
    let mut merged = Vec::with_capacity(sentences.len());
    let mut iter = sentences.into_iter().peekable();
    while let Some(sentence) = iter.next() {
        if pointer.is_match(&sentence) {
            if let Some(next) = iter.next() {
                merged.push(format!("{} {}", sentence, next));
                continue;
            }
        }
        merged.push(sentence);
    }
    merged
}

/// Segment blocks into sentences with global `S<n>` ids and per-block `P<n>` ids.
pub fn segment_blocks(
    blocks: &[Block],
    annotator: &dyn Annotator,
    opts: &CompiledOptions,
) -> Result<Vec<SegmentedSentence>> {
    let merge_rows = opts.raw.merge_table_rows;
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    let mut sentence_no = 1usize;
    let mut paragraph_no = 1usize;

    for block in blocks {
        if !is_block_tag(&block.tag, merge_rows) {
            continue;
        }
        if block.parent_tags.iter().any(|p| is_block_tag(p, merge_rows)) {
            continue;
        }
        let text = block_text(block, opts);
        if text.is_empty() || seen.contains(&text) {
            tracing::trace!(tag = %block.tag, "skipping empty or repeated block");
            continue;
        }

        let split: Vec<String> = annotator
            .split_sentences(&text)?
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let tag = block.tag.to_ascii_lowercase();
        let paragraph_id = format!("P{}", paragraph_no);
        for sentence in merge_pointers(split, &opts.pointer) {
            out.push(SegmentedSentence {
                id: format!("S{}", sentence_no),
                text: sentence,
                html_tag: tag.clone(),
                paragraph_id: paragraph_id.clone(),
            });
            sentence_no += 1;
        }
        seen.insert(text);
        paragraph_no += 1;
    }
    Ok(out)
}

/// Extract candidate blocks from raw HTML in document order.
///
/// Text nodes are trimmed and joined with single spaces. Every element that
/// could be block-level is returned with its ancestors; nesting is resolved
/// by [`segment_blocks`].
pub fn blocks_from_html(html: &str, opts: &CompiledOptions) -> Vec<Block> {
    let merge_rows = opts.raw.merge_table_rows;
    let document = Html::parse_document(html);
    document
        .select(&ANY_ELEMENT)
        .filter(|el| is_block_tag(el.value().name(), merge_rows))
        .map(|el| {
            let tag = el.value().name().to_string();
            let cells = if tag == ROW_TAG {
                el.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|c| matches!(c.value().name(), "td" | "th"))
                    .map(|c| element_text(&c))
                    .collect()
            } else {
                Vec::new()
            };
            Block {
                text: element_text(&el),
                parent_tags: el
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .map(|a| a.value().name().to_string())
                    .collect(),
                cells,
                tag,
            }
        })
        .collect()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode document bytes using the declared charset, or detect it.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|c| encoding_rs::Encoding::for_label(c.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Charset parameter of a Content-Type value, lowercased and unquoted.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}
