// ABOUTME: Cosine similarity and the text-to-text similarity operation.
// ABOUTME: Texts without usable token vectors score 0.0; scores are rounded to 4 decimals.

use crate::annotation::{embed_all, Annotator, Embedder};
use crate::error::Result;

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Empty, mismatched or zero-norm inputs score 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Round to `places` decimal places.
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f64.powi(places);
    ((value as f64 * factor).round() / factor) as f32
}

/// Round a similarity score to 4 decimals.
pub fn round4(value: f32) -> f32 {
    round_to(value, 4)
}

/// Unrounded similarity of two texts.
///
/// Both texts are annotated; when either has no non-stopword, non-punctuation
/// token with a vector the score is 0.0 and the embedder is not called.
pub fn text_similarity(
    annotator: &dyn Annotator,
    embedder: &dyn Embedder,
    text1: &str,
    text2: &str,
) -> Result<f32> {
    let scores = pair_similarities(annotator, embedder, &[(text1, text2)])?;
    Ok(scores.into_iter().next().unwrap_or(0.0))
}

/// Unrounded similarities for several pairs, in input order.
///
/// All texts that need a vector go to the embedder in a single batch.
pub fn pair_similarities(
    annotator: &dyn Annotator,
    embedder: &dyn Embedder,
    pairs: &[(&str, &str)],
) -> Result<Vec<f32>> {
    let mut usable = Vec::with_capacity(pairs.len());
    let mut to_embed: Vec<&str> = Vec::new();
    for &(a, b) in pairs {
        let ok = annotator.annotate(a)?.has_usable_vectors()
            && annotator.annotate(b)?.has_usable_vectors();
        if ok {
            to_embed.push(a);
            to_embed.push(b);
        }
        usable.push(ok);
    }

    let subject = pairs.first().map(|(a, _)| *a).unwrap_or_default();
    let vectors = embed_all(embedder, &to_embed, subject)?;
    let mut vectors = vectors.chunks_exact(2);
    let scores = usable
        .into_iter()
        .map(|ok| {
            if !ok {
                return 0.0;
            }
            match vectors.next() {
                Some([v1, v2]) => cosine(v1, v2),
                _ => 0.0,
            }
        })
        .collect();
    Ok(scores)
}
