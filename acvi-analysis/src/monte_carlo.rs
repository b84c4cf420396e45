use crate::ranking::{ranking_correlation, top_n_overlap};
use crate::stability::TOP_OVERLAP_DEPTH;
use acvi_core::error::{AcviError, Result};
use acvi_core::scores::{rank_by_score, RankByComposite};
use acvi_core::stats::{mean, percentile, population_std, rmse};
use acvi_core::{Component, ComponentScores, ScoreCard, WeightVector};
use acvi_index::composite_score;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Settings for the Monte Carlo perturbation battery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub trials: usize,
    pub seed: u64,
    /// Uniform jitter bounds applied per component weight before
    /// renormalization.
    pub weight_jitter: (f64, f64),
    /// Standard deviation of the multiplicative Gaussian score noise
    /// (mean 1.0).
    pub noise_std: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            trials: 1000,
            seed: 42,
            weight_jitter: (0.9, 1.1),
            noise_std: 0.05,
        }
    }
}

/// Summary over all Monte Carlo trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub trials: usize,
    pub mean_rank_correlation: f64,
    pub std_rank_correlation: f64,
    pub rank_correlation_p5: f64,
    pub rank_correlation_p95: f64,
    pub mean_rmse: f64,
    pub mean_top10_overlap: f64,
}

/// Monte Carlo stability of the composite ranking.
///
/// Each trial jitters the default weights by an independent uniform factor
/// per component (renormalized to sum 1) and perturbs every normalized
/// component value of every location by multiplicative Gaussian noise,
/// clamping the result back to the 0-100 score range. All draws come from
/// one ChaCha stream seeded with `config.seed`, so a run is bit-for-bit
/// reproducible.
pub fn monte_carlo(
    cards: &[ScoreCard],
    default: &WeightVector,
    config: &MonteCarloConfig,
) -> Result<MonteCarloReport> {
    if cards.len() < 2 {
        return Err(AcviError::InsufficientSample {
            context: "Monte Carlo simulation".to_string(),
            needed: 2,
            found: cards.len(),
        });
    }
    if config.trials == 0 {
        return Err(AcviError::InsufficientSample {
            context: "Monte Carlo trials".to_string(),
            needed: 1,
            found: 0,
        });
    }
    let noise = Normal::new(1.0, config.noise_std)
        .map_err(|e| AcviError::Computation(format!("noise distribution: {e}")))?;
    let (jitter_low, jitter_high) = config.weight_jitter;
    if jitter_low > jitter_high {
        return Err(AcviError::Computation(format!(
            "weight jitter bounds out of order: [{jitter_low}, {jitter_high}]"
        )));
    }

    let baseline_scores: Vec<f64> = cards.iter().map(|card| card.composite).collect();
    let baseline_ranking = cards.ranking();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut rank_correlations = Vec::with_capacity(config.trials);
    let mut score_errors = Vec::with_capacity(config.trials);
    let mut overlaps = Vec::with_capacity(config.trials);

    for _ in 0..config.trials {
        let mut jittered = [0.0; 4];
        for component in Component::ALL {
            let factor = if jitter_high > jitter_low {
                rng.gen_range(jitter_low..jitter_high)
            } else {
                jitter_low
            };
            jittered[component.index()] = default.get(component) * factor;
        }
        let weights = WeightVector::new(jittered).normalized();

        let mut noisy: Vec<ComponentScores> = cards.iter().map(|card| card.normalized).collect();
        for component in Component::ALL {
            for scores in noisy.iter_mut() {
                let factor = noise.sample(&mut rng);
                let value = (scores.get(component) * factor).clamp(0.0, 100.0);
                scores.set(component, value);
            }
        }

        let pairs: Vec<(String, f64)> = cards
            .iter()
            .zip(noisy.iter())
            .map(|(card, scores)| (card.location.clone(), composite_score(scores, &weights)))
            .collect();
        let scores: Vec<f64> = pairs.iter().map(|(_, score)| *score).collect();
        let ranking = rank_by_score(&pairs);

        rank_correlations.push(ranking_correlation(&baseline_ranking, &ranking));
        score_errors.push(rmse(&baseline_scores, &scores));
        overlaps.push(top_n_overlap(&baseline_ranking, &ranking, TOP_OVERLAP_DEPTH) as f64);
    }

    Ok(MonteCarloReport {
        trials: config.trials,
        mean_rank_correlation: mean(&rank_correlations).unwrap_or(0.0),
        std_rank_correlation: population_std(&rank_correlations),
        rank_correlation_p5: percentile(&rank_correlations, 5.0).unwrap_or(0.0),
        rank_correlation_p95: percentile(&rank_correlations, 95.0).unwrap_or(0.0),
        mean_rmse: mean(&score_errors).unwrap_or(0.0),
        mean_top10_overlap: mean(&overlaps).unwrap_or(0.0),
    })
}
