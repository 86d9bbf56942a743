//! Similarity ranking over the precomputed embedding index.
//!
//! Scores are plain dot products. Provider vectors are expected to be
//! L2-normalised already, in which case this equals cosine similarity; when
//! they are not, scores are unbounded but the ordering is still total.

use std::cmp::Ordering;

use studentia_core::types::RankedCandidate;
use studentia_store::EmbeddingIndex;

pub fn vector_similarity(x: &[f32], y: &[f32]) -> f32 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// Every indexed section, best first. Equal scores fall back to ascending
/// `(title, heading)` so the order is reproducible.
pub fn rank(query_vector: &[f32], index: &EmbeddingIndex) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = index
        .iter()
        .map(|(key, embedding)| RankedCandidate { score: vector_similarity(query_vector, embedding), key: key.clone() })
        .collect();
    ranked.sort_by(compare_candidates);
    ranked
}

fn compare_candidates(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    // `+ 0.0` folds -0.0 into 0.0 so signed zeros tie and fall through to the key.
    (b.score + 0.0).total_cmp(&(a.score + 0.0)).then_with(|| a.key.cmp(&b.key))
}
