//! The validate command: correlate a scores CSV against an external
//! yield-volatility table.

use crate::scores_io;
use acvi_validate::{CropOutcome, YieldVolatility};
use anyhow::Context;
use csv::ReaderBuilder;
use log::info;
use std::collections::HashMap;
use std::fs::File;

pub fn run_validate(scores_csv: &str, yield_csv: &str, report_json: &str) -> anyhow::Result<()> {
    let cards = scores_io::read_scores_csv(scores_csv)?;
    let table = read_yield_csv(yield_csv)?;
    info!(
        "validating {} locations against {} yield rows",
        cards.len(),
        table.len()
    );

    // The CLI derives the country from the id prefix before the first
    // underscore; callers of the library API can inject a real lookup.
    let countries: HashMap<String, String> = cards
        .iter()
        .map(|card| {
            let prefix = card.location.split('_').next().unwrap_or(&card.location);
            (card.location.clone(), prefix.to_string())
        })
        .collect();

    let report = acvi_validate::validate(&cards, &countries, &table);
    for outcome in &report.crops {
        match outcome {
            CropOutcome::Completed { report } => {
                for metric in &report.composite {
                    info!(
                        "{}: acvi vs {}: r={:.4}, p={:.4}, significant={}",
                        report.crop, metric.metric, metric.r, metric.p_value, metric.significant
                    );
                }
            }
            CropOutcome::Skipped { crop, reason } => info!("{crop}: {reason}"),
        }
    }

    let file = File::create(report_json)?;
    serde_json::to_writer_pretty(file, &report)?;
    info!("report written to {report_json}");
    Ok(())
}

/// Read the external yield table: country,crop,mean_yield,cv_yield,detrended_cv.
fn read_yield_csv(path: &str) -> anyhow::Result<Vec<YieldVolatility>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading yield CSV {path}"))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: YieldVolatility = row.with_context(|| format!("parsing yield CSV {path}"))?;
        rows.push(row);
    }
    anyhow::ensure!(!rows.is_empty(), "no yield rows in {path}");
    Ok(rows)
}
