// ABOUTME: The Tagger orchestrator that wires providers, classifiers and the relevance state machine.
// ABOUTME: Exposes analyze, process_article, similarity, subtopics and section analysis operations.

use std::sync::Arc;

use crate::annotation::{embed_all, AnnotatedSentence, Annotator, Embedder, GrammarChecker};
use crate::classify::{self, grammar, SentenceContext};
use crate::error::{Result, TaggerError};
use crate::options::{CompiledOptions, GrammarSignal, TaggerBuilder};
use crate::record::{
    AnalysisRequest, AnalysisResponse, ArticleRequest, ClassificationRecord, Placement,
    SimilarityBatchRequest, SimilarityBatchResponse, SimilarityRequest, SimilarityResponse,
};
use crate::relevance::{is_answer, AnswerSignals, KeywordContext, RelevanceState};
use crate::sections::{self, SectionReport, SectionRequest};
use crate::segment::{self, Block, SegmentedSentence};
use crate::similarity::{cosine, pair_similarities, round4, text_similarity};
use crate::subtopics::{self, CompetitorAnalysisRequest};

/// Classifies sentences against a keyword using external annotation providers.
///
/// A `Tagger` holds no per-request state and can be shared across threads.
#[derive(Clone)]
pub struct Tagger {
    annotator: Arc<dyn Annotator>,
    embedder: Arc<dyn Embedder>,
    grammar: Option<Arc<dyn GrammarChecker>>,
    opts: CompiledOptions,
}

impl std::fmt::Debug for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tagger")
            .field("opts", &self.opts.raw)
            .field("grammar", &self.grammar.is_some())
            .finish()
    }
}

/// Lowercase and validate a keyword.
fn normalize_keyword(op: &str, keyword: &str) -> Result<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(TaggerError::invalid_keyword(op, keyword));
    }
    Ok(trimmed.to_lowercase())
}

impl Tagger {
    /// Create a new TaggerBuilder.
    pub fn builder() -> TaggerBuilder {
        TaggerBuilder::new()
    }

    pub fn new(
        annotator: Arc<dyn Annotator>,
        embedder: Arc<dyn Embedder>,
        grammar: Option<Arc<dyn GrammarChecker>>,
        opts: CompiledOptions,
    ) -> Self {
        Self {
            annotator,
            embedder,
            grammar,
            opts,
        }
    }

    pub fn options(&self) -> &CompiledOptions {
        &self.opts
    }

    /// Classify a flat list of sentences. Blank ids become `S<position>`.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let keyword = normalize_keyword("analyze", &request.primary_keyword)?;
        let items = request
            .sentences
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let id = if s.id.trim().is_empty() {
                    format!("S{}", i + 1)
                } else {
                    s.id.clone()
                };
                (
                    Placement {
                        sentence_id: id,
                        ..Placement::default()
                    },
                    s.text.as_str(),
                )
            })
            .collect();
        self.classify_sentences("analyze", items, &keyword)
    }

    /// Segment a raw HTML document and classify its sentences.
    pub fn process_article(&self, request: &ArticleRequest) -> Result<AnalysisResponse> {
        let keyword = normalize_keyword("process article", &request.primary_keyword)?;
        let blocks = segment::blocks_from_html(&request.html_content, &self.opts);
        self.classify_segments("process article", &blocks, &keyword)
    }

    /// Decode document bytes, then run [`process_article`](Self::process_article).
    pub fn process_article_bytes(
        &self,
        body: &[u8],
        content_type: Option<&str>,
        keyword: &str,
    ) -> Result<AnalysisResponse> {
        self.process_article(&ArticleRequest {
            html_content: segment::decode_html(body, content_type),
            primary_keyword: keyword.to_string(),
        })
    }

    /// Classify blocks that were extracted elsewhere.
    pub fn classify_blocks(&self, blocks: &[Block], keyword: &str) -> Result<AnalysisResponse> {
        let keyword = normalize_keyword("classify blocks", keyword)?;
        self.classify_segments("classify blocks", blocks, &keyword)
    }

    fn classify_segments(&self, op: &str, blocks: &[Block], keyword: &str) -> Result<AnalysisResponse> {
        let segments = segment::segment_blocks(blocks, self.annotator.as_ref(), &self.opts)
            .inspect_err(|e| tracing::warn!(op, error = %e, "segmentation failed"))?;
        let items = segments
            .iter()
            .map(|s: &SegmentedSentence| {
                (
                    Placement {
                        sentence_id: s.id.clone(),
                        html_tag: Some(s.html_tag.clone()),
                        paragraph_id: Some(s.paragraph_id.clone()),
                    },
                    s.text.as_str(),
                )
            })
            .collect();
        self.classify_sentences(op, items, keyword)
    }

    fn annotate(&self, text: &str) -> Result<AnnotatedSentence> {
        if text.trim().is_empty() {
            return Ok(AnnotatedSentence::default());
        }
        self.annotator
            .annotate(text)
            .inspect_err(|e| tracing::warn!(error = %e, "annotation failed"))
    }

    fn classify_sentences(
        &self,
        op: &str,
        items: Vec<(Placement, &str)>,
        keyword: &str,
    ) -> Result<AnalysisResponse> {
        tracing::debug!(op, keyword, sentences = items.len(), "classifying sentences");

        let keyword_doc = self.annotate(keyword)?;
        let docs = items
            .iter()
            .map(|(_, text)| self.annotate(text))
            .collect::<Result<Vec<_>>>()?;

        let (keyword_vec, vectors) = self.embeddings(keyword, &keyword_doc, &items, &docs)?;
        let keyword_ctx = KeywordContext::new(&keyword_doc, keyword_vec.unwrap_or_default());

        let mut state = RelevanceState::new();
        let mut records = Vec::with_capacity(items.len());
        let mut answer_position = None;

        for (((placement, text), doc), vector) in items.into_iter().zip(&docs).zip(vectors) {
            let ctx = SentenceContext::new(doc, text, &self.opts).with_keyword_active(state.is_active());
            let mut labels = classify::label_sentence(ctx);
            if let Some(checker) = self.checker() {
                labels.grammatical = grammar::check_with(checker, text)
                    .inspect_err(|e| tracing::warn!(error = %e, "grammar check failed"))?;
            }

            let transition = state.step(doc, &keyword_ctx, &self.opts.lexicon.opening_pronouns);
            let similarity = match vector {
                Some(v) if !keyword_ctx.embedding.is_empty() => cosine(&v, &keyword_ctx.embedding),
                _ => 0.0,
            };
            let answer = is_answer(
                &AnswerSignals {
                    informative: labels.informative,
                    has_verbal: doc.has_verbal(),
                    self_contained: labels.self_contained,
                    similarity,
                    relevant_by_context: transition.relevant_by_context(),
                },
                self.opts.raw.answer_threshold,
            );
            tracing::trace!(
                id = %placement.sentence_id,
                informative = labels.informative.as_str(),
                ?transition,
                similarity,
                answer,
                "classified sentence"
            );

            if answer && answer_position.is_none() {
                answer_position = Some(placement.sentence_id.clone());
            }
            records.push(ClassificationRecord::new(
                placement,
                text,
                &labels,
                round4(similarity),
                answer,
            ));
        }

        Ok(AnalysisResponse {
            sentences: records,
            answer_position_index: answer_position,
        })
    }

    fn checker(&self) -> Option<&dyn GrammarChecker> {
        match self.opts.raw.grammar_signal {
            GrammarSignal::Checker => self.grammar.as_deref(),
            GrammarSignal::Heuristic => None,
        }
    }

    /// Keyword and sentence vectors, taken from the annotations where present.
    ///
    /// Texts without usable token vectors get `None`; everything else missing
    /// is embedded in a single batch.
    #[allow(clippy::type_complexity)]
    fn embeddings(
        &self,
        keyword: &str,
        keyword_doc: &AnnotatedSentence,
        items: &[(Placement, &str)],
        docs: &[AnnotatedSentence],
    ) -> Result<(Option<Vec<f32>>, Vec<Option<Vec<f32>>>)> {
        let needs = |doc: &AnnotatedSentence| doc.has_usable_vectors() && doc.embedding.is_none();

        let mut batch: Vec<&str> = Vec::new();
        if needs(keyword_doc) {
            batch.push(keyword);
        }
        for ((_, text), doc) in items.iter().zip(docs) {
            if needs(doc) {
                batch.push(*text);
            }
        }
        let fetched = embed_all(self.embedder.as_ref(), &batch, keyword)?;
        let mut fetched = fetched.into_iter();

        let mut pick = |doc: &AnnotatedSentence| -> Option<Vec<f32>> {
            if !doc.has_usable_vectors() {
                return None;
            }
            match &doc.embedding {
                Some(v) => Some(v.clone()),
                None => fetched.next(),
            }
        };
        let keyword_vec = pick(keyword_doc);
        let vectors = docs.iter().map(&mut pick).collect();
        Ok((keyword_vec, vectors))
    }

    /// Similarity of two texts, rounded to 4 decimals.
    pub fn similarity(&self, request: &SimilarityRequest) -> Result<SimilarityResponse> {
        let score = text_similarity(
            self.annotator.as_ref(),
            self.embedder.as_ref(),
            &request.text1,
            &request.text2,
        )?;
        Ok(SimilarityResponse {
            similarity: round4(score),
        })
    }

    /// Similarities for many pairs, in input order.
    pub fn similarity_batch(&self, request: &SimilarityBatchRequest) -> Result<SimilarityBatchResponse> {
        let pairs: Vec<(&str, &str)> = request
            .items
            .iter()
            .map(|p| (p.text1.as_str(), p.text2.as_str()))
            .collect();
        let scores = pair_similarities(self.annotator.as_ref(), self.embedder.as_ref(), &pairs)?;
        Ok(SimilarityBatchResponse {
            similarities: scores.into_iter().map(round4).collect(),
        })
    }

    /// Representative headings that several competitors agree on.
    pub fn subtopics(&self, request: &CompetitorAnalysisRequest) -> Result<Vec<String>> {
        let headings = request.headings();
        let groups = subtopics::subtopic_groups(
            self.embedder.as_ref(),
            &headings,
            self.opts.raw.subtopic_threshold,
            self.opts.raw.subtopic_min_sources,
        )?;
        tracing::debug!(headings = headings.len(), groups = groups.len(), "clustered headings");
        Ok(groups.into_iter().map(|g| g.representative).collect())
    }

    /// Score heading-led sections of a page against a keyword.
    pub fn analyze_sections(&self, request: &SectionRequest) -> Result<SectionReport> {
        let keyword = normalize_keyword("analyze sections", &request.keyword)?;
        sections::analyze_sections(
            self.annotator.as_ref(),
            self.embedder.as_ref(),
            request,
            &keyword,
            &self.opts,
        )
    }
}
