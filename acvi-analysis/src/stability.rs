use crate::ranking::{ranking_correlation, top_n_overlap};
use crate::scenarios::{scenario_battery, WeightScenario};
use crate::RANK_CORRELATION_TARGET;
use acvi_core::error::{AcviError, Result};
use acvi_core::scores::{rank_by_score, RankByComposite};
use acvi_core::stats::{mean, pearson, population_std};
use acvi_core::{ScoreCard, WeightVector};
use acvi_index::composite_score;
use serde::{Deserialize, Serialize};

/// How deep the top-overlap comparison looks.
pub const TOP_OVERLAP_DEPTH: usize = 10;

/// Outcome of re-scoring the cohort under one weight scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub weights: WeightVector,
    /// Spearman correlation of the scenario ranking against the baseline.
    pub rank_correlation: f64,
    /// Pearson correlation of the scenario scores against the baseline.
    pub score_correlation: f64,
    pub top10_overlap: usize,
}

/// The weight-scenario stability battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    pub scenarios: Vec<ScenarioResult>,
    pub mean_rank_correlation: f64,
    pub std_rank_correlation: f64,
    pub min_rank_correlation: f64,
    /// How many scenarios kept a rank correlation above 0.9.
    pub scenarios_above_target: usize,
}

/// Re-rank the cohort under every scenario in the fixed battery and
/// summarize how stable the baseline ranking is.
///
/// The baseline is the composite score stored on the cards; scenario scores
/// are recomputed from the normalized components, so the comparison
/// exercises the same pure scorer the pipeline used.
pub fn weight_stability(
    cards: &[ScoreCard],
    default: &WeightVector,
    seed: u64,
) -> Result<StabilityReport> {
    if cards.len() < 2 {
        return Err(AcviError::InsufficientSample {
            context: "weight-scenario stability".to_string(),
            needed: 2,
            found: cards.len(),
        });
    }
    let baseline_scores: Vec<f64> = cards.iter().map(|card| card.composite).collect();
    let baseline_ranking = cards.ranking();

    let scenarios: Vec<ScenarioResult> = scenario_battery(default, seed)
        .into_iter()
        .map(|scenario| evaluate_scenario(cards, &baseline_scores, &baseline_ranking, scenario))
        .collect();

    let correlations: Vec<f64> = scenarios.iter().map(|s| s.rank_correlation).collect();
    Ok(StabilityReport {
        mean_rank_correlation: mean(&correlations).unwrap_or(0.0),
        std_rank_correlation: population_std(&correlations),
        min_rank_correlation: correlations.iter().fold(f64::MAX, |a, b| a.min(*b)),
        scenarios_above_target: correlations
            .iter()
            .filter(|r| **r > RANK_CORRELATION_TARGET)
            .count(),
        scenarios,
    })
}

fn evaluate_scenario(
    cards: &[ScoreCard],
    baseline_scores: &[f64],
    baseline_ranking: &[String],
    scenario: WeightScenario,
) -> ScenarioResult {
    let pairs: Vec<(String, f64)> = cards
        .iter()
        .map(|card| {
            (
                card.location.clone(),
                composite_score(&card.normalized, &scenario.weights),
            )
        })
        .collect();
    let scores: Vec<f64> = pairs.iter().map(|(_, score)| *score).collect();
    let ranking = rank_by_score(&pairs);
    ScenarioResult {
        label: scenario.label,
        weights: scenario.weights,
        rank_correlation: ranking_correlation(baseline_ranking, &ranking),
        score_correlation: pearson(baseline_scores, &scores).unwrap_or(0.0),
        top10_overlap: top_n_overlap(baseline_ranking, &ranking, TOP_OVERLAP_DEPTH),
    }
}
