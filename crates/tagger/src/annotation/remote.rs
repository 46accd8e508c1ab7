// ABOUTME: Blocking HTTP client for an annotation sidecar service (spaCy, embeddings, grammar).
// ABOUTME: Maps every transport, status or decode failure to a provider error.

//! Remote annotation provider.
//!
//! Talks to a sidecar that exposes four JSON endpoints:
//!
//! - `POST /annotate`  `{"text": ..}`    -> spaCy document
//! - `POST /sentences` `{"text": ..}`    -> `{"sentences": [..]}`
//! - `POST /embed`     `{"texts": [..]}` -> `{"vectors": [[..], ..]}`
//! - `POST /grammar`   `{"text": ..}`    -> `{"issues": [..]}`
//!
//! Calls are synchronous. Nothing is retried here.

use std::time::Duration;

use anyhow::anyhow;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::spacy::SpacyDoc;
use super::{AnnotatedSentence, Annotator, Embedder, GrammarChecker, GrammarIssue};
use crate::error::{ErrorCode, Result, TaggerError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct TextsBody<'a> {
    texts: &'a [&'a str],
}

#[derive(Deserialize)]
struct SentencesReply {
    sentences: Vec<String>,
}

#[derive(Deserialize)]
struct VectorsReply {
    vectors: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct IssuesReply {
    #[serde(default)]
    issues: Vec<GrammarIssue>,
}

/// HTTP-backed provider.
#[derive(Debug, Clone)]
pub struct RemoteAnnotator {
    base: Url,
    http: Client,
}

impl RemoteAnnotator {
    /// Create a client for the sidecar at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            TaggerError::config("parse annotator url", base_url, Some(e.into()))
        })?;
        // Url::join drops the last path segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaggerError::config("build http client", base_url, Some(e.into())))?;
        Ok(Self { base, http })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        code: ErrorCode,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let fail = |source: anyhow::Error| {
            tracing::warn!(endpoint, error = %source, "annotation sidecar call failed");
            TaggerError {
                code,
                op: format!("POST /{}", endpoint),
                subject: self.base.to_string(),
                source: Some(source),
            }
        };

        let url = self.base.join(endpoint).map_err(|e| fail(e.into()))?;
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .map_err(|e| fail(e.into()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fail(anyhow!("unexpected status {}", status)));
        }
        resp.json::<R>().map_err(|e| fail(e.into()))
    }
}

impl Annotator for RemoteAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedSentence> {
        let doc: SpacyDoc = self.post(ErrorCode::Annotation, "annotate", &TextBody { text })?;
        Ok(doc.into_sentence())
    }

    fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let reply: SentencesReply =
            self.post(ErrorCode::Annotation, "sentences", &TextBody { text })?;
        Ok(reply.sentences)
    }
}

impl Embedder for RemoteAnnotator {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors.pop().ok_or_else(|| {
            TaggerError::embedding("POST /embed", text, Some(anyhow!("empty vector list")))
        })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let reply: VectorsReply = self.post(ErrorCode::Embedding, "embed", &TextsBody { texts })?;
        if reply.vectors.len() != texts.len() {
            return Err(TaggerError::embedding(
                "POST /embed",
                self.base.to_string(),
                Some(anyhow!(
                    "expected {} vectors, got {}",
                    texts.len(),
                    reply.vectors.len()
                )),
            ));
        }
        Ok(reply.vectors)
    }
}

impl GrammarChecker for RemoteAnnotator {
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>> {
        let reply: IssuesReply = self.post(ErrorCode::Grammar, "grammar", &TextBody { text })?;
        Ok(reply.issues)
    }
}
