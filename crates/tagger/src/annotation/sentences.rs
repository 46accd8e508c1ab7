// ABOUTME: Regex sentence boundary splitter used when a provider stores no explicit split.
// ABOUTME: Splits on terminal punctuation followed by whitespace, keeping the punctuation.

use once_cell::sync::Lazy;
use regex::Regex;

// `. ! ?` runs (optionally followed by a closing quote or bracket) then whitespace.
// Abbreviations like "Dr. Smith" over-split; list pointers such as "i." are
// expected to come out as their own sentence and get merged downstream.
static BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]]?\s+"#).expect("invalid sentence boundary regex"));

/// Split `text` into trimmed, non-empty sentences in textual order.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in BOUNDARY.find_iter(text) {
        let end = m.end();
        let piece = text[start..end].trim();
        if !piece.is_empty() {
            sentences.push(piece.to_string());
        }
        start = end;
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            split_sentences("First one. Second one? Third!"),
            vec!["First one.", "Second one?", "Third!"]
        );
    }

    #[test]
    fn keeps_closing_quotes_with_sentence() {
        assert_eq!(
            split_sentences(r#"He said "stop." Then left."#),
            vec![r#"He said "stop.""#, "Then left."]
        );
    }

    #[test]
    fn list_pointer_comes_out_alone() {
        assert_eq!(
            split_sentences("i. Pay tax quarterly."),
            vec!["i.", "Pay tax quarterly."]
        );
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split_sentences("   ").is_empty());
    }
}
