// ABOUTME: Error types for the Lexis tagger including ErrorCode enum and TaggerError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of tagging failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Annotation,
    Embedding,
    Grammar,
    InvalidKeyword,
    InvalidInput,
    Config,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Annotation => "annotation provider error",
            ErrorCode::Embedding => "embedding provider error",
            ErrorCode::Grammar => "grammar checker error",
            ErrorCode::InvalidKeyword => "invalid keyword",
            ErrorCode::InvalidInput => "invalid input",
            ErrorCode::Config => "configuration error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for tagging operations.
///
/// `subject` names what the operation was working on: the text handed to a
/// provider, an endpoint, or a config path. It is truncated for display.
#[derive(Debug, thiserror::Error)]
pub struct TaggerError {
    pub code: ErrorCode,
    pub op: String,
    pub subject: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

const SUBJECT_DISPLAY_CHARS: usize = 60;

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lexis: {}", self.op)?;
        if !self.subject.is_empty() {
            let shown: String = self.subject.chars().take(SUBJECT_DISPLAY_CHARS).collect();
            if shown.len() < self.subject.len() {
                write!(f, " {:?}...", shown)?;
            } else {
                write!(f, " {:?}", shown)?;
            }
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl TaggerError {
    fn new(
        code: ErrorCode,
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            op: op.into(),
            subject: subject.into(),
            source,
        }
    }

    /// Create an Annotation error.
    pub fn annotation(
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Annotation, op, subject, source)
    }

    /// Create an Embedding error.
    pub fn embedding(
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Embedding, op, subject, source)
    }

    /// Create a Grammar error.
    pub fn grammar(
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Grammar, op, subject, source)
    }

    /// Create an InvalidKeyword error.
    pub fn invalid_keyword(op: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidKeyword,
            op,
            keyword,
            Some(anyhow::anyhow!("keyword must contain at least one non-space character")),
        )
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidInput, op, subject, source)
    }

    /// Create a Config error.
    pub fn config(
        op: impl Into<String>,
        subject: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Config, op, subject, source)
    }

    /// Returns true if this is an Annotation error.
    pub fn is_annotation(&self) -> bool {
        self.code == ErrorCode::Annotation
    }

    /// Returns true if this is an Embedding error.
    pub fn is_embedding(&self) -> bool {
        self.code == ErrorCode::Embedding
    }

    /// Returns true if this is a Grammar error.
    pub fn is_grammar(&self) -> bool {
        self.code == ErrorCode::Grammar
    }

    /// Returns true if this is an InvalidKeyword error.
    pub fn is_invalid_keyword(&self) -> bool {
        self.code == ErrorCode::InvalidKeyword
    }

    /// Returns true if this is an InvalidInput error.
    pub fn is_invalid_input(&self) -> bool {
        self.code == ErrorCode::InvalidInput
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// True for failures raised by an external provider.
    pub fn is_provider(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Annotation | ErrorCode::Embedding | ErrorCode::Grammar
        )
    }
}

/// Result alias used throughout the tagger.
pub type Result<T> = std::result::Result<T, TaggerError>;
