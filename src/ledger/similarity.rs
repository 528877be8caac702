//! Near-duplicate comment detection via bigram overlap.

use std::collections::HashSet;

/// Pairs scoring strictly above this are reported.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// A pair of comments flagged as similar.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarPair {
    pub first: String,
    pub second: String,
    /// Similarity as a percentage, rounded to the nearest integer.
    pub percent: u32,
}

/// Consecutive character pairs of `s`. Case-sensitive, whitespace included.
fn bigrams(s: &str) -> HashSet<(char, char)> {
    s.chars().zip(s.chars().skip(1)).collect()
}

/// Dice coefficient over bigram sets, in `[0.0, 1.0]`.
///
/// Equal strings score 1.0. Strings too short to yield a bigram score 0.0
/// against anything but themselves.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let first = bigrams(a);
    let second = bigrams(b);
    if first.is_empty() || second.is_empty() {
        return 0.0;
    }
    let overlap = first.intersection(&second).count();
    2.0 * overlap as f64 / (first.len() + second.len()) as f64
}

/// Scan all comments pairwise and collect pairs above the threshold.
///
/// Quadratic on purpose: this backs a manual diagnostic command, not a hot
/// path. Pairs come out in `(i, j)` order with `i < j` over insertion order,
/// never sorted by score.
pub fn similar_pairs(comments: &[String]) -> Vec<SimilarPair> {
    let mut pairs = Vec::new();
    for i in 0..comments.len() {
        for j in (i + 1)..comments.len() {
            let score = similarity(&comments[i], &comments[j]);
            if score > SIMILARITY_THRESHOLD {
                pairs.push(SimilarPair {
                    first: comments[i].clone(),
                    second: comments[j].clone(),
                    percent: (score * 100.0).round() as u32,
                });
            }
        }
    }
    pairs
}
