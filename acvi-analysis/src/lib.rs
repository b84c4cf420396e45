//! Robustness diagnostics for the composite ACVI ranking.
//!
//! Four independent diagnostics probe whether the ranking survives
//! perturbation: the fixed weight-scenario battery ([`stability`]),
//! multicollinearity of the raw components ([`collinearity`]), Monte Carlo
//! noise injection ([`monte_carlo`]) and the regional ANOVA confound check
//! ([`geographic`]). Each diagnostic is pure given the cohort's score
//! cards; a failure in one is reported and never blocks the others.

pub mod collinearity;
pub mod geographic;
pub mod monte_carlo;
pub mod ranking;
pub mod scenarios;
pub mod stability;

use acvi_core::{ScoreCard, WeightVector};
use log::warn;
use serde::{Deserialize, Serialize};

pub use collinearity::{multicollinearity, CollinearityReport};
pub use geographic::{regional_anova, AnovaReport};
pub use monte_carlo::{monte_carlo, MonteCarloConfig, MonteCarloReport};
pub use stability::{weight_stability, StabilityReport};

/// Significance level shared by every test in the battery.
pub const ALPHA: f64 = 0.05;

/// A diagnostic must keep this much rank correlation to count as stable.
pub const RANK_CORRELATION_TARGET: f64 = 0.90;

/// Maximum acceptable variance inflation factor.
pub const VIF_LIMIT: f64 = 10.0;

/// How many roll-up checks the battery runs.
pub const CHECKS_TOTAL: usize = 4;

/// Settings for a full robustness run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Seed for the scenario battery's random perturbations.
    pub seed: u64,
    pub default_weights: WeightVector,
    pub monte_carlo: MonteCarloConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            seed: 42,
            default_weights: WeightVector::default(),
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

/// Outcome of one diagnostic: either its report, or the reason it was
/// skipped. Skips are structured results, never panics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Diagnostic<T> {
    Completed { report: T },
    Skipped { reason: String },
}

impl<T> Diagnostic<T> {
    fn from_result(name: &str, result: acvi_core::Result<T>) -> Self {
        match result {
            Ok(report) => Diagnostic::Completed { report },
            Err(error) => {
                warn!("{name} skipped: {error}");
                Diagnostic::Skipped {
                    reason: error.to_string(),
                }
            }
        }
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            Diagnostic::Completed { report } => Some(report),
            Diagnostic::Skipped { .. } => None,
        }
    }
}

/// The full robustness battery plus the pass/fail roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustnessReport {
    pub weight_stability: Diagnostic<StabilityReport>,
    pub multicollinearity: Diagnostic<CollinearityReport>,
    pub monte_carlo: Diagnostic<MonteCarloReport>,
    pub regional_anova: Diagnostic<AnovaReport>,
    pub checks_passed: usize,
    pub checks_total: usize,
}

/// Run all four diagnostics and roll up the pass/fail checks:
/// mean scenario rank correlation above 0.90, max VIF below 10, mean Monte
/// Carlo rank correlation above 0.90, and no significant regional confound
/// (ANOVA p >= 0.05). A skipped diagnostic fails its check.
pub fn run_robustness(cards: &[ScoreCard], config: &AnalysisConfig) -> RobustnessReport {
    let stability = Diagnostic::from_result(
        "weight stability",
        weight_stability(cards, &config.default_weights, config.seed),
    );
    let collinearity_report =
        Diagnostic::from_result("multicollinearity", multicollinearity(cards));
    let monte_carlo_report = Diagnostic::from_result(
        "Monte Carlo",
        monte_carlo(cards, &config.default_weights, &config.monte_carlo),
    );
    let regional = Diagnostic::from_result("regional ANOVA", regional_anova(cards));

    let mut checks_passed = 0;
    if let Some(report) = stability.report() {
        if report.mean_rank_correlation > RANK_CORRELATION_TARGET {
            checks_passed += 1;
        }
    }
    if let Some(report) = collinearity_report.report() {
        if report.max_vif() < VIF_LIMIT {
            checks_passed += 1;
        }
    }
    if let Some(report) = monte_carlo_report.report() {
        if report.mean_rank_correlation > RANK_CORRELATION_TARGET {
            checks_passed += 1;
        }
    }
    if let Some(report) = regional.report() {
        if !report.significant {
            checks_passed += 1;
        }
    }

    RobustnessReport {
        weight_stability: stability,
        multicollinearity: collinearity_report,
        monte_carlo: monte_carlo_report,
        regional_anova: regional,
        checks_passed,
        checks_total: CHECKS_TOTAL,
    }
}
