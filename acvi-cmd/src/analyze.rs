//! The analyze command: run the robustness battery over a scores CSV.

use crate::scores_io;
use acvi_analysis::{run_robustness, AnalysisConfig, MonteCarloConfig};
use acvi_core::WeightVector;
use log::info;
use std::fs::File;

pub fn run_analyze(
    scores_csv: &str,
    report_json: &str,
    seed: u64,
    trials: usize,
) -> anyhow::Result<()> {
    let cards = scores_io::read_scores_csv(scores_csv)?;
    info!("loaded {} locations from {scores_csv}", cards.len());

    let config = AnalysisConfig {
        seed,
        default_weights: WeightVector::default(),
        monte_carlo: MonteCarloConfig {
            trials,
            seed,
            ..MonteCarloConfig::default()
        },
    };
    let report = run_robustness(&cards, &config);

    if let Some(stability) = report.weight_stability.report() {
        info!(
            "weight stability: mean r={:.4}, min r={:.4}, {}/{} scenarios above 0.9",
            stability.mean_rank_correlation,
            stability.min_rank_correlation,
            stability.scenarios_above_target,
            stability.scenarios.len()
        );
    }
    if let Some(collinearity) = report.multicollinearity.report() {
        info!(
            "multicollinearity: max VIF {:.2}, assessment {}",
            collinearity.max_vif(),
            collinearity.assessment.as_str()
        );
    }
    if let Some(monte_carlo) = report.monte_carlo.report() {
        info!(
            "monte carlo ({} trials): mean r={:.4}, 5th-95th [{:.4}, {:.4}], mean RMSE {:.3}",
            monte_carlo.trials,
            monte_carlo.mean_rank_correlation,
            monte_carlo.rank_correlation_p5,
            monte_carlo.rank_correlation_p95,
            monte_carlo.mean_rmse
        );
    }
    if let Some(anova) = report.regional_anova.report() {
        info!(
            "regional ANOVA: F={:.3}, p={:.4}, significant={}",
            anova.f_statistic, anova.p_value, anova.significant
        );
    }
    info!(
        "{}/{} checks passed",
        report.checks_passed, report.checks_total
    );

    let file = File::create(report_json)?;
    serde_json::to_writer_pretty(file, &report)?;
    info!("report written to {report_json}");
    Ok(())
}
