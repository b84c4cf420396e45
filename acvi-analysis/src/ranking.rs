//! Ranking comparison helpers shared by the scenario battery and the Monte
//! Carlo simulation.

use acvi_core::stats::spearman;
use std::collections::{HashMap, HashSet};

/// Spearman rank correlation between two rankings, computed over the
/// location ids common to both. 0.0 when fewer than two ids are shared.
pub fn ranking_correlation(baseline: &[String], other: &[String]) -> f64 {
    let positions: HashMap<&str, usize> = other
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();
    let mut baseline_ranks = Vec::new();
    let mut other_ranks = Vec::new();
    for (index, id) in baseline.iter().enumerate() {
        if let Some(&position) = positions.get(id.as_str()) {
            baseline_ranks.push(index as f64);
            other_ranks.push(position as f64);
        }
    }
    spearman(&baseline_ranks, &other_ranks).unwrap_or(0.0)
}

/// Size of the overlap between the first `n` entries of two rankings.
pub fn top_n_overlap(baseline: &[String], other: &[String], n: usize) -> usize {
    let top_baseline: HashSet<&str> = baseline.iter().take(n).map(String::as_str).collect();
    other
        .iter()
        .take(n)
        .filter(|id| top_baseline.contains(id.as_str()))
        .count()
}
