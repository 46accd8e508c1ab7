// ABOUTME: In-memory annotation provider backed by precomputed annotations keyed by exact text.
// ABOUTME: Implements Annotator, Embedder and GrammarChecker; loads from JSON files.

//! Precomputed annotation table.
//!
//! An `AnnotationTable` answers provider calls from data computed ahead of
//! time, typically by running a spaCy pipeline once over a document and
//! dumping the results. Lookups are by exact text. A text the table has no
//! entry for is a provider error, never a silent default.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "sentences": { "<text>": { "text": "...", "tokens": [...] } },
//!   "spacy": { "<text>": { "text": "...", "tokens": [...], "ents": [...] } },
//!   "splits": { "<block text>": ["first.", "second."] },
//!   "embeddings": { "<text>": [0.1, 0.2] },
//!   "grammar": { "<text>": [ { "message": "..." } ] }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use super::conll;
use super::spacy::SpacyDoc;
use super::{sentences, AnnotatedSentence, Annotator, Embedder, GrammarChecker, GrammarIssue};
use crate::error::{Result, TaggerError};

/// Precomputed annotations, splits, embeddings and grammar issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationTable {
    #[serde(default)]
    sentences: HashMap<String, AnnotatedSentence>,
    #[serde(default, skip_serializing)]
    spacy: HashMap<String, SpacyDoc>,
    #[serde(default)]
    splits: HashMap<String, Vec<String>>,
    #[serde(default)]
    embeddings: HashMap<String, Vec<f32>>,
    #[serde(default)]
    grammar: HashMap<String, Vec<GrammarIssue>>,
}

impl AnnotationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table: AnnotationTable = serde_json::from_str(json)
            .map_err(|e| TaggerError::config("load annotation table", "", Some(e.into())))?;
        table.absorb_spacy();
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            TaggerError::config(
                "read annotation table",
                path.display().to_string(),
                Some(e.into()),
            )
        })?;
        Self::from_json(&json)
    }

    fn absorb_spacy(&mut self) {
        for (key, doc) in self.spacy.drain() {
            self.sentences.insert(key, doc.into_sentence());
        }
    }

    /// Add every sentence of a CoNLL-U document, keyed by its text.
    pub fn load_conllu(&mut self, src: &str) -> Result<usize> {
        let parsed = conll::parse_conllu(src)?;
        let count = parsed.len();
        for sentence in parsed {
            self.insert_sentence(sentence);
        }
        Ok(count)
    }

    /// Register an annotated sentence under its own text.
    pub fn insert_sentence(&mut self, sentence: AnnotatedSentence) {
        self.sentences.insert(sentence.text.clone(), sentence);
    }

    /// Register an explicit sentence split for a block of text.
    pub fn insert_split(&mut self, text: impl Into<String>, sentences: Vec<String>) {
        self.splits.insert(text.into(), sentences);
    }

    /// Register an embedding for a text.
    pub fn insert_embedding(&mut self, text: impl Into<String>, vector: Vec<f32>) {
        self.embeddings.insert(text.into(), vector);
    }

    /// Register grammar issues for a text.
    pub fn insert_grammar(&mut self, text: impl Into<String>, issues: Vec<GrammarIssue>) {
        self.grammar.insert(text.into(), issues);
    }

    /// Builder-style variant of [`insert_sentence`](Self::insert_sentence).
    pub fn with_sentence(mut self, sentence: AnnotatedSentence) -> Self {
        self.insert_sentence(sentence);
        self
    }

    /// Builder-style variant of [`insert_embedding`](Self::insert_embedding).
    pub fn with_embedding(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.insert_embedding(text, vector);
        self
    }

    /// Number of annotated sentences held.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl Annotator for AnnotationTable {
    fn annotate(&self, text: &str) -> Result<AnnotatedSentence> {
        self.sentences.get(text).cloned().ok_or_else(|| {
            TaggerError::annotation(
                "annotate",
                text,
                Some(anyhow!("no precomputed annotation for this text")),
            )
        })
    }

    fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        if let Some(split) = self.splits.get(text) {
            return Ok(split.clone());
        }
        Ok(sentences::split_sentences(text))
    }
}

impl Embedder for AnnotationTable {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(vector) = self.embeddings.get(text) {
            return Ok(vector.clone());
        }
        if let Some(vector) = self.sentences.get(text).and_then(|s| s.embedding.clone()) {
            return Ok(vector);
        }
        Err(TaggerError::embedding(
            "embed",
            text,
            Some(anyhow!("no precomputed embedding for this text")),
        ))
    }
}

impl GrammarChecker for AnnotationTable {
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>> {
        self.grammar.get(text).cloned().ok_or_else(|| {
            TaggerError::grammar(
                "check",
                text,
                Some(anyhow!("no precomputed grammar report for this text")),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_text_is_a_provider_error() {
        let table = AnnotationTable::new();
        let err = table.annotate("Missing.").unwrap_err();
        assert!(err.is_annotation());
        assert!(table.embed("Missing.").unwrap_err().is_embedding());
        assert!(table.check("Missing.").unwrap_err().is_grammar());
    }

    #[test]
    fn spacy_entries_are_converted_on_load() {
        let json = r#"{
            "spacy": {
                "Go now.": {
                    "text": "Go now.",
                    "tokens": [
                        {"text": "Go", "pos": "VERB", "tag": "VB", "dep": "ROOT", "head": 0},
                        {"text": "now", "pos": "ADV", "tag": "RB", "dep": "advmod", "head": 0},
                        {"text": ".", "pos": "PUNCT", "tag": ".", "dep": "punct", "head": 0, "is_punct": true}
                    ]
                }
            },
            "embeddings": {"Go now.": [1.0, 0.0]}
        }"#;
        let table = AnnotationTable::from_json(json).unwrap();
        let sentence = table.annotate("Go now.").unwrap();
        assert_eq!(sentence.tokens.len(), 3);
        assert_eq!(table.embed("Go now.").unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn conllu_sentences_are_keyed_by_text() {
        let mut table = AnnotationTable::new();
        let n = table
            .load_conllu("# text = Go now.\n1 Go go VERB VB _ 0 ROOT _ _\n2 now now ADV RB _ 1 advmod _ _\n3 . . PUNCT . _ 1 punct _ _\n")
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(table.annotate("Go now.").unwrap().tokens[0].tag, "VB");
    }

    #[test]
    fn split_prefers_stored_split() {
        let mut table = AnnotationTable::new();
        table.insert_split("Dr. Who arrived.", vec!["Dr. Who arrived.".to_string()]);
        assert_eq!(
            table.split_sentences("Dr. Who arrived.").unwrap(),
            vec!["Dr. Who arrived."]
        );
        assert_eq!(table.split_sentences("A. B.").unwrap(), vec!["A.", "B."]);
    }

    #[test]
    fn embedding_falls_back_to_annotation_vector() {
        let table = AnnotationTable::new().with_sentence(AnnotatedSentence {
            text: "Hi.".to_string(),
            embedding: Some(vec![0.5, 0.5]),
            ..Default::default()
        });
        assert_eq!(table.embed("Hi.").unwrap(), vec![0.5, 0.5]);
    }
}
