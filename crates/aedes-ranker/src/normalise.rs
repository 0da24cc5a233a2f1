//! Score normalisation functions.
//!
//! Compliance and factor scores live on different scales, so each is
//! min-max rescaled onto [0, 1] across the current strategy set before
//! they are combined. The two passes are always independent.

use std::collections::BTreeMap;

/// Min-max normalisation: (x - min) / (max - min).
/// Returns normalised scores in the same order as input.
///
/// If every score is equal the set is degenerate and every strategy gets 1.0,
/// so a uniformly good field is not zeroed out.
pub fn minmax_normalise(raw_scores: &[f64]) -> Vec<f64> {
    if raw_scores.is_empty() {
        return vec![];
    }

    let min = raw_scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![1.0; raw_scores.len()];
    }

    let span = max - min;
    raw_scores.iter().map(|&x| (x - min) / span).collect()
}

/// Keyed variant: normalise an ordered set of (strategy, raw score) pairs.
pub fn normalise_scores(raw_scores: &[(String, f64)]) -> BTreeMap<String, f64> {
    let values: Vec<f64> = raw_scores.iter().map(|(_, v)| *v).collect();
    raw_scores
        .iter()
        .map(|(id, _)| id.clone())
        .zip(minmax_normalise(&values))
        .collect()
}
