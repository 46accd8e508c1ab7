// ABOUTME: Groups near-duplicate headings from competing sources into consensus subtopics.
// ABOUTME: Greedy seed-in-order clustering over heading embeddings with a distinct-source quorum.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::annotation::{embed_all, Embedder};
use crate::error::{Result, TaggerError};
use crate::similarity::cosine;

/// One competing page and its headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(rename = "Url", default)]
    pub url: String,
    #[serde(rename = "Headings", default)]
    pub headings: Vec<String>,
    #[serde(rename = "Intent", default)]
    pub intent: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorAnalysisRequest {
    pub data: Vec<Competitor>,
}

impl CompetitorAnalysisRequest {
    /// Every heading paired with the index of the source it came from.
    pub fn headings(&self) -> Vec<SourcedHeading> {
        self.data
            .iter()
            .enumerate()
            .flat_map(|(source, c)| {
                c.headings.iter().map(move |h| SourcedHeading {
                    source,
                    text: h.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedHeading {
    pub source: usize,
    pub text: String,
}

/// A set of similar headings accepted as one subtopic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingGroup {
    pub headings: Vec<String>,
    pub sources: BTreeSet<usize>,
    /// Longest member heading; the earliest one wins ties.
    pub representative: String,
}

/// Cluster headings given one vector per heading.
///
/// Seeds are visited in input order. Each ungrouped seed collects every
/// later ungrouped heading whose similarity exceeds `threshold`. A group
/// touching at least `min_sources` distinct sources is accepted and its
/// members retire; otherwise the members stay eligible.
///
/// Fails when there is not exactly one vector per heading.
pub fn cluster_headings(
    headings: &[SourcedHeading],
    vectors: &[Vec<f32>],
    threshold: f32,
    min_sources: usize,
) -> Result<Vec<HeadingGroup>> {
    if vectors.len() != headings.len() {
        return Err(TaggerError::invalid_input(
            "cluster headings",
            headings.first().map(|h| h.text.as_str()).unwrap_or_default(),
            Some(anyhow::anyhow!(
                "{} headings but {} vectors",
                headings.len(),
                vectors.len()
            )),
        ));
    }
    let mut grouped = vec![false; headings.len()];
    let mut groups = Vec::new();

    for seed in 0..headings.len() {
        if grouped[seed] {
            continue;
        }
        let mut members = vec![seed];
        for other in seed + 1..headings.len() {
            if grouped[other] {
                continue;
            }
            if cosine(&vectors[seed], &vectors[other]) > threshold {
                members.push(other);
            }
        }

        let sources: BTreeSet<usize> = members.iter().map(|&i| headings[i].source).collect();
        if sources.len() < min_sources {
            continue;
        }

        let mut representative = &headings[seed].text;
        for &i in &members {
            if headings[i].text.chars().count() > representative.chars().count() {
                representative = &headings[i].text;
            }
        }
        let group = HeadingGroup {
            headings: members.iter().map(|&i| headings[i].text.clone()).collect(),
            sources,
            representative: representative.clone(),
        };
        tracing::trace!(representative = %group.representative, size = members.len(), "accepted heading group");
        for &i in &members {
            grouped[i] = true;
        }
        groups.push(group);
    }
    Ok(groups)
}

/// Embed every heading in one batch and cluster them.
pub fn subtopic_groups(
    embedder: &dyn Embedder,
    headings: &[SourcedHeading],
    threshold: f32,
    min_sources: usize,
) -> Result<Vec<HeadingGroup>> {
    if headings.is_empty() {
        return Ok(Vec::new());
    }
    let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
    let vectors = embed_all(embedder, &texts, texts[0])?;
    cluster_headings(headings, &vectors, threshold, min_sources)
}
