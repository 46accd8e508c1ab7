// ABOUTME: Tunable thresholds and switches for the tagger, plus the TaggerBuilder.
// ABOUTME: Options deserialize from JSON with every field defaulted.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotator, Embedder, GrammarChecker};
use crate::error::{Result, TaggerError};
use crate::lexicon::{self, CompiledLexicon, Lexicon};
use crate::tagger::Tagger;

/// Which signal decides the grammar-correct flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarSignal {
    /// Structural heuristics over the annotation.
    #[default]
    Heuristic,
    /// The external grammar checker; zero issues means correct.
    Checker,
}

impl fmt::Display for GrammarSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrammarSignal::Heuristic => "heuristic",
            GrammarSignal::Checker => "checker",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for GrammarSignal {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "checker" | "tool" | "languagetool" => GrammarSignal::Checker,
            _ => GrammarSignal::Heuristic,
        }
    }
}

/// Thresholds for the clarity classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityThresholds {
    /// Active Simple/Compound sentences shorter than this are Focused.
    pub focused_max_tokens: usize,
    /// Sentences longer than this are LowClarity.
    pub low_clarity_max_tokens: usize,
    /// With more than this many tokens, a modifier burst makes a sentence LowClarity.
    pub modifier_burst_min_tokens: usize,
    /// Modifier count above which the burst rule fires.
    pub modifier_burst_count: usize,
    /// Adjective+adverb share of tokens above which a sentence is LowClarity.
    pub max_modifier_ratio: f32,
    /// Average dependency depth above which a sentence is LowClarity.
    pub max_average_depth: f32,
}

impl Default for ClarityThresholds {
    fn default() -> Self {
        Self {
            focused_max_tokens: 15,
            low_clarity_max_tokens: 25,
            modifier_burst_min_tokens: 15,
            modifier_burst_count: 5,
            max_modifier_ratio: 0.5,
            max_average_depth: 4.0,
        }
    }
}

/// Configuration options for the tagger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerOptions {
    /// Keyword similarity above which a sentence can be an answer.
    pub answer_threshold: f32,
    /// Heading similarity above which two headings group together.
    pub subtopic_threshold: f32,
    /// Distinct sources a heading group needs to become a subtopic.
    pub subtopic_min_sources: usize,
    /// Sentences with fewer words than this and no verb are Filler.
    pub filler_max_tokens: usize,
    pub clarity: ClarityThresholds,
    pub grammar_signal: GrammarSignal,
    /// Label absolute wording ("guaranteed", "never") as False info quality.
    pub flag_absolute_claims: bool,
    /// Leading list numbering stripped before the capitalization check.
    pub list_prefix_pattern: String,
    /// Sentences made only of list markers, merged with their successor.
    pub pointer_pattern: String,
    /// Emit whole table rows as blocks instead of individual cells.
    pub merge_table_rows: bool,
    /// Separator placed between cell texts of a table row.
    pub cell_separator: String,
    /// Publisher names treated like first-person subjects for provenance.
    pub brand_terms: Vec<String>,
    /// Replaces the builtin lexicon when set.
    pub lexicon: Option<Lexicon>,
}

/// Roman numerals accepted as list markers run from i to xxxix.
pub const DEFAULT_LIST_PREFIX_PATTERN: &str =
    r"^\s*(?:\(?(?:x{1,3}(?:ix|iv|v?i{0,3})|ix|iv|v?i{1,3}|v|\d+|[a-z])[.)]\s+|[-*•]\s+)";
pub const DEFAULT_POINTER_PATTERN: &str =
    r"^(?:(?:x{1,3}(?:ix|iv|v?i{0,3})|ix|iv|v?i{1,3}|v|\d+|[a-z])[.)])+$";

impl Default for TaggerOptions {
    fn default() -> Self {
        Self {
            answer_threshold: 0.60,
            subtopic_threshold: 0.60,
            subtopic_min_sources: 3,
            filler_max_tokens: 4,
            clarity: ClarityThresholds::default(),
            grammar_signal: GrammarSignal::Heuristic,
            flag_absolute_claims: false,
            list_prefix_pattern: DEFAULT_LIST_PREFIX_PATTERN.to_string(),
            pointer_pattern: DEFAULT_POINTER_PATTERN.to_string(),
            merge_table_rows: false,
            cell_separator: " | ".to_string(),
            brand_terms: Vec::new(),
            lexicon: None,
        }
    }
}

impl TaggerOptions {
    /// Parse options from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TaggerError::config("parse options", "", Some(e.into())))
    }

    /// Load options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TaggerError::config("read options", path.display().to_string(), Some(e.into()))
        })?;
        Self::from_json(&json)
    }

    /// Validate and precompile everything the classifiers need.
    pub fn compile(self) -> Result<CompiledOptions> {
        if !(0.0..=1.0).contains(&self.answer_threshold) {
            return Err(TaggerError::config(
                "validate options",
                format!("answer_threshold={}", self.answer_threshold),
                Some(anyhow::anyhow!("threshold must be within [0, 1]")),
            ));
        }
        if !(-1.0..=1.0).contains(&self.subtopic_threshold) {
            return Err(TaggerError::config(
                "validate options",
                format!("subtopic_threshold={}", self.subtopic_threshold),
                Some(anyhow::anyhow!("threshold must be within [-1, 1]")),
            ));
        }

        let list_prefix = compile_case_insensitive(&self.list_prefix_pattern, "list_prefix_pattern")?;
        let pointer = compile_case_insensitive(&self.pointer_pattern, "pointer_pattern")?;
        let lexicon = match &self.lexicon {
            Some(custom) => Arc::new(CompiledLexicon::compile(custom)?),
            None => Arc::new(lexicon::builtin().clone()),
        };
        let brand_terms = self
            .brand_terms
            .iter()
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .collect();

        Ok(CompiledOptions {
            list_prefix,
            pointer,
            lexicon,
            brand_terms,
            raw: self,
        })
    }
}

fn compile_case_insensitive(pattern: &str, field: &str) -> Result<Regex> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| TaggerError::config("compile regex", field, Some(e.into())))
}

/// Options after validation, with regexes and the lexicon compiled.
#[derive(Debug, Clone)]
pub struct CompiledOptions {
    pub raw: TaggerOptions,
    pub list_prefix: Regex,
    pub pointer: Regex,
    pub lexicon: Arc<CompiledLexicon>,
    pub brand_terms: Vec<String>,
}

impl Default for CompiledOptions {
    fn default() -> Self {
        TaggerOptions::default()
            .compile()
            .expect("default options always compile")
    }
}

/// Builder for constructing Tagger instances with custom configuration.
#[derive(Clone, Default)]
pub struct TaggerBuilder {
    opts: TaggerOptions,
    annotator: Option<Arc<dyn Annotator>>,
    embedder: Option<Arc<dyn Embedder>>,
    grammar: Option<Arc<dyn GrammarChecker>>,
}

impl fmt::Debug for TaggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggerBuilder")
            .field("opts", &self.opts)
            .field("annotator", &self.annotator.is_some())
            .field("embedder", &self.embedder.is_some())
            .field("grammar", &self.grammar.is_some())
            .finish()
    }
}

impl TaggerBuilder {
    /// Create a new TaggerBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options.
    pub fn options(mut self, opts: TaggerOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Set the annotation provider.
    pub fn annotator(mut self, annotator: Arc<dyn Annotator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the external grammar checker.
    pub fn grammar_checker(mut self, checker: Arc<dyn GrammarChecker>) -> Self {
        self.grammar = Some(checker);
        self
    }

    /// Set the keyword similarity threshold for answer sentences.
    pub fn answer_threshold(mut self, threshold: f32) -> Self {
        self.opts.answer_threshold = threshold;
        self
    }

    /// Choose the grammar signal.
    pub fn grammar_signal(mut self, signal: GrammarSignal) -> Self {
        self.opts.grammar_signal = signal;
        self
    }

    /// Add a publisher name treated as a first-person subject.
    pub fn brand_term(mut self, term: impl Into<String>) -> Self {
        self.opts.brand_terms.push(term.into());
        self
    }

    /// Build the Tagger. Fails when a provider is missing or options do not compile.
    pub fn build(self) -> Result<Tagger> {
        let annotator = self.annotator.ok_or_else(|| {
            TaggerError::config("build tagger", "annotator", Some(anyhow::anyhow!("no annotator set")))
        })?;
        let embedder = self.embedder.ok_or_else(|| {
            TaggerError::config("build tagger", "embedder", Some(anyhow::anyhow!("no embedder set")))
        })?;
        if self.opts.grammar_signal == GrammarSignal::Checker && self.grammar.is_none() {
            return Err(TaggerError::config(
                "build tagger",
                "grammar_checker",
                Some(anyhow::anyhow!("grammar signal 'checker' needs a grammar checker")),
            ));
        }
        let opts = self.opts.compile()?;
        Ok(Tagger::new(annotator, embedder, self.grammar, opts))
    }
}
