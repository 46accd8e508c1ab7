// ABOUTME: Annotated sentence model and the provider contracts the tagger consumes.
// ABOUTME: Defines the internal part-of-speech, dependency and entity vocabularies.

//! Annotation model and provider contracts.
//!
//! The tagger never parses text itself. An [`Annotator`] turns raw text into
//! [`AnnotatedSentence`]s, an [`Embedder`] turns text into vectors and an
//! optional [`GrammarChecker`] reports grammar issues. Provider adapters map
//! their own label schemes into the enums defined here, so the classifiers
//! only ever see this vocabulary.
//!
//! Submodules:
//! - `conll`: CoNLL-U reader for dependency-annotated sentences.
//! - `spacy`: mapping from spaCy-style JSON documents into this model.
//! - `table`: precomputed annotations keyed by exact text.
//! - `remote`: blocking HTTP client for an annotation sidecar.
//! - `sentences`: regex sentence splitter used when a provider has no split.

pub mod conll;
pub mod remote;
pub mod sentences;
pub mod spacy;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};

/// Coarse part of speech (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Adjective,
    Adposition,
    Adverb,
    Auxiliary,
    CoordinatingConjunction,
    Determiner,
    Interjection,
    Noun,
    Numeral,
    Particle,
    Pronoun,
    ProperNoun,
    Punctuation,
    SubordinatingConjunction,
    Symbol,
    Verb,
    Space,
    #[default]
    Other,
}

impl PartOfSpeech {
    /// Verbs and auxiliaries both count as verbal material.
    pub fn is_verbal(self) -> bool {
        matches!(self, PartOfSpeech::Verb | PartOfSpeech::Auxiliary)
    }

    /// Adjectives and adverbs.
    pub fn is_modifier(self) -> bool {
        matches!(self, PartOfSpeech::Adjective | PartOfSpeech::Adverb)
    }
}

/// Dependency role of a token relative to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepRole {
    Root,
    NominalSubject,
    PassiveNominalSubject,
    ClausalSubject,
    PassiveClausalSubject,
    Expletive,
    DirectObject,
    IndirectObject,
    Dative,
    PrepositionalObject,
    Attribute,
    AdjectivalComplement,
    Auxiliary,
    PassiveAuxiliary,
    Conjunct,
    CoordinatingConjunction,
    AdverbialClause,
    RelativeClause,
    ClausalComplement,
    OpenClausalComplement,
    AdnominalClause,
    Marker,
    AdjectivalModifier,
    AdverbialModifier,
    Compound,
    Possessive,
    NominalModifier,
    NumericModifier,
    Appositional,
    Determiner,
    Preposition,
    Negation,
    Discourse,
    Parataxis,
    Punctuation,
    #[default]
    Other,
}

impl DepRole {
    /// Any subject relation, active or passive, nominal or clausal.
    pub fn is_subject(self) -> bool {
        matches!(
            self,
            DepRole::NominalSubject
                | DepRole::PassiveNominalSubject
                | DepRole::ClausalSubject
                | DepRole::PassiveClausalSubject
        )
    }

    /// Relations that attach a subordinate clause.
    pub fn is_dependent_clause(self) -> bool {
        matches!(
            self,
            DepRole::AdverbialClause
                | DepRole::RelativeClause
                | DepRole::ClausalComplement
                | DepRole::AdnominalClause
        )
    }

    /// Object-like relations (direct, indirect, dative, prepositional).
    pub fn is_object(self) -> bool {
        matches!(
            self,
            DepRole::DirectObject
                | DepRole::IndirectObject
                | DepRole::Dative
                | DepRole::PrepositionalObject
        )
    }

    /// Dependents that belong to a noun phrase around their head.
    pub fn is_nominal_modifier(self) -> bool {
        matches!(
            self,
            DepRole::Compound
                | DepRole::AdjectivalModifier
                | DepRole::Possessive
                | DepRole::NominalModifier
        )
    }
}

/// Named-entity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Norp,
    Facility,
    Organization,
    GeopoliticalEntity,
    Location,
    Product,
    Event,
    WorkOfArt,
    Law,
    Language,
    Date,
    Time,
    Percent,
    Money,
    Quantity,
    Ordinal,
    Cardinal,
    Other,
}

/// Grammatical number from the morphological feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalNumber {
    Singular,
    Plural,
}

/// The subset of morphological features the classifiers read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Morphology {
    #[serde(default)]
    pub number: Option<GrammaticalNumber>,
    #[serde(default)]
    pub person: Option<u8>,
}

/// One token with its linguistic annotations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: PartOfSpeech,
    /// Fine-grained Penn Treebank tag (`VB`, `PRP$`, ...).
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub dep: DepRole,
    /// Index of the syntactic head within the sentence; the root points at itself.
    #[serde(default)]
    pub head: usize,
    #[serde(default)]
    pub is_stop: bool,
    #[serde(default)]
    pub is_punct: bool,
    #[serde(default)]
    pub entity: Option<EntityKind>,
    #[serde(default)]
    pub morph: Morphology,
    /// Number of ancestors between this token and the root.
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub has_vector: bool,
}

impl AnnotatedToken {
    /// Lowercased surface text.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A labelled entity span over token indices `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: EntityKind,
    pub text: String,
}

/// A sentence as produced by the annotation provider. Never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<AnnotatedToken>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl AnnotatedSentence {
    /// Index of the first root token, if any.
    pub fn root_index(&self) -> Option<usize> {
        self.tokens.iter().position(|t| t.dep == DepRole::Root)
    }

    /// The first root token, if any.
    pub fn root(&self) -> Option<&AnnotatedToken> {
        self.root_index().map(|i| &self.tokens[i])
    }

    /// Token count excluding punctuation and whitespace.
    pub fn word_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| !t.is_punct && t.pos != PartOfSpeech::Space)
            .count()
    }

    /// True when any token is a verb or auxiliary.
    pub fn has_verbal(&self) -> bool {
        self.tokens.iter().any(|t| t.pos.is_verbal())
    }

    /// True when any entity span carries one of the given labels.
    pub fn has_entity(&self, kinds: &[EntityKind]) -> bool {
        self.entities.iter().any(|e| kinds.contains(&e.label))
    }

    /// Direct dependents of the token at `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = (usize, &AnnotatedToken)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(i, t)| *i != index && t.head == index)
    }

    /// The syntactic head of the token at `index` (None for roots).
    pub fn head_of(&self, index: usize) -> Option<&AnnotatedToken> {
        let token = self.tokens.get(index)?;
        if token.head == index {
            return None;
        }
        self.tokens.get(token.head)
    }

    /// Tokens that are usable for vector similarity.
    pub fn has_usable_vectors(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| !t.is_stop && !t.is_punct && t.has_vector)
    }
}

/// A grammar issue reported by an external checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub message: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub rule_id: Option<String>,
}

/// Turns raw text into annotated sentences.
///
/// Implementations must be deterministic for identical input and must map
/// their native label schemes into this module's enums.
pub trait Annotator: Send + Sync {
    /// Annotate `text` as a single sentence.
    fn annotate(&self, text: &str) -> Result<AnnotatedSentence>;

    /// Split `text` into sentence strings, in textual order.
    fn split_sentences(&self, text: &str) -> Result<Vec<String>>;
}

/// Turns text into fixed-length vectors.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts. Results are in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Embed `texts` in one batch and insist on exactly one vector per text.
///
/// An empty `texts` skips the provider. `subject` names the request in the
/// error.
pub fn embed_all(
    embedder: &dyn Embedder,
    texts: &[&str],
    subject: &str,
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let vectors = embedder
        .embed_batch(texts)
        .inspect_err(|e| tracing::warn!(error = %e, "embedding failed"))?;
    if vectors.len() != texts.len() {
        tracing::warn!(
            expected = texts.len(),
            got = vectors.len(),
            "embedder returned a short batch"
        );
        return Err(TaggerError::embedding(
            "embed batch",
            subject,
            Some(anyhow::anyhow!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )),
        ));
    }
    Ok(vectors)
}

/// An external grammar and style checker.
pub trait GrammarChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>>;
}

/// Compute depth for every token by walking head links to the root.
///
/// Cycles or out-of-range heads stop the walk.
pub fn compute_depths(tokens: &mut [AnnotatedToken]) {
    let heads: Vec<usize> = tokens.iter().map(|t| t.head).collect();
    for (i, token) in tokens.iter_mut().enumerate() {
        let mut depth = 0;
        let mut current = i;
        while let Some(&head) = heads.get(current) {
            if head == current || depth > heads.len() {
                break;
            }
            depth += 1;
            current = head;
        }
        token.depth = depth;
    }
}


#[cfg(test)]
mod tests {
    use super::test_embedders::ShortBatch;
    use super::*;

    #[test]
    fn embed_all_rejects_short_batches() {
        let err = embed_all(&ShortBatch { keep: 1 }, &["a", "b"], "kw").unwrap_err();
        assert!(err.is_embedding());
        assert!(err.to_string().contains("expected 2 vectors, got 1"));

        let vectors = embed_all(&ShortBatch { keep: 5 }, &["a", "b"], "kw").unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(embed_all(&ShortBatch { keep: 0 }, &[], "kw").unwrap().is_empty());
    }

    fn tok(text: &str, dep: DepRole, head: usize) -> AnnotatedToken {
        AnnotatedToken {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            dep,
            head,
            ..Default::default()
        }
    }

    #[test]
    fn depths_follow_head_links() {
        let mut tokens = vec![
            tok("The", DepRole::Determiner, 1),
            tok("cat", DepRole::NominalSubject, 2),
            tok("sleeps", DepRole::Root, 2),
        ];
        compute_depths(&mut tokens);
        let depths: Vec<usize> = tokens.iter().map(|t| t.depth).collect();
        assert_eq!(depths, vec![2, 1, 0]);
    }

    #[test]
    fn depth_walk_survives_cycles() {
        let mut tokens = vec![tok("a", DepRole::Other, 1), tok("b", DepRole::Other, 0)];
        compute_depths(&mut tokens);
        assert!(tokens[0].depth <= 3);
    }

    #[test]
    fn children_and_head_lookup() {
        let sentence = AnnotatedSentence {
            text: "The cat sleeps".to_string(),
            tokens: vec![
                tok("The", DepRole::Determiner, 1),
                tok("cat", DepRole::NominalSubject, 2),
                tok("sleeps", DepRole::Root, 2),
            ],
            ..Default::default()
        };
        let kids: Vec<usize> = sentence.children(2).map(|(i, _)| i).collect();
        assert_eq!(kids, vec![1]);
        assert_eq!(sentence.head_of(1).map(|t| t.text.as_str()), Some("sleeps"));
        assert!(sentence.head_of(2).is_none());
        assert_eq!(sentence.root_index(), Some(2));
    }
}
