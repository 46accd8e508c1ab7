// ABOUTME: Main library entry point for the Lexis sentence tagger.
// ABOUTME: Re-exports the public API: Tagger, TaggerBuilder, TaggerOptions, records, requests and errors.

//! Lexis - sentence classification and keyword relevance for web content.
//!
//! Sentences are labelled along independent axes (functional type, clause
//! structure, voice, informative type, info quality, clarity, citation,
//! grammar, pronoun use, provenance), scored against a target keyword, and
//! the sentences that best answer the keyword are flagged. Tokenization,
//! parsing, embeddings and grammar checks come from external providers
//! behind the [`Annotator`], [`Embedder`] and [`GrammarChecker`] traits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lexis_tagger::{AnalysisRequest, AnnotationTable, SentenceInput, Tagger, TaggerError};
//!
//! fn main() -> Result<(), TaggerError> {
//!     let table = Arc::new(AnnotationTable::from_path("annotations.json")?);
//!     let tagger = Tagger::builder()
//!         .annotator(table.clone())
//!         .embedder(table)
//!         .build()?;
//!     let response = tagger.analyze(&AnalysisRequest {
//!         sentences: vec![SentenceInput::new("S1", "Refunds take five days.")],
//!         primary_keyword: "refund".to_string(),
//!     })?;
//!     println!("{:?}", response.answer_position_index);
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod classify;
pub mod error;
pub mod lexicon;
pub mod options;
pub mod record;
pub mod relevance;
pub mod sections;
pub mod segment;
pub mod similarity;
pub mod subtopics;
pub mod tagger;

pub use crate::annotation::remote::RemoteAnnotator;
pub use crate::annotation::table::AnnotationTable;
pub use crate::annotation::{
    AnnotatedSentence, AnnotatedToken, Annotator, Embedder, GrammarChecker, GrammarIssue,
};
pub use crate::classify::{
    ClarityType, EntitySummary, FunctionalType, InfoQuality, InformativeType, SentenceLabels,
    SourceType, Structure, Voice,
};
pub use crate::error::{ErrorCode, Result, TaggerError};
pub use crate::lexicon::{load_builtin_lexicon, Lexicon};
pub use crate::options::{GrammarSignal, TaggerBuilder, TaggerOptions};
pub use crate::record::{
    AnalysisRequest, AnalysisResponse, ArticleRequest, ClassificationRecord, SentenceInput,
    SimilarityBatchRequest, SimilarityBatchResponse, SimilarityRequest, SimilarityResponse,
};
pub use crate::sections::{ContentItem, SectionReport, SectionRequest};
pub use crate::segment::Block;
pub use crate::subtopics::{Competitor, CompetitorAnalysisRequest};
pub use crate::tagger::Tagger;
