use crate::yield_data::YieldVolatility;
use acvi_core::error::AcviError;
use acvi_core::stats::{mean, pearson, pearson_p_value};
use acvi_core::{Component, ComponentScores, ScoreCard};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Minimum joined rows for a crop's correlation to be meaningful.
pub const MIN_JOINED_ROWS: usize = 3;

/// Significance level for the validation correlations.
pub const ALPHA: f64 = 0.05;

/// Country-level aggregate of location scores (arithmetic mean).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryAggregate {
    pub country: String,
    pub locations: usize,
    pub composite: f64,
    /// Mean raw components, kept on their original scales.
    pub components: ComponentScores,
}

/// Correlation of the composite score against one yield metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricCorrelation {
    pub metric: String,
    pub r: f64,
    pub p_value: f64,
    pub significant: bool,
    pub samples: usize,
}

/// Correlation of one raw component against one yield metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMetricCorrelation {
    pub component: Component,
    pub metric: String,
    pub r: f64,
    pub p_value: f64,
}

/// Validation result for one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropValidation {
    pub crop: String,
    pub samples: usize,
    pub composite: Vec<MetricCorrelation>,
    pub components: Vec<ComponentMetricCorrelation>,
}

/// Per-crop outcome: either the correlations, or an explicit
/// insufficient-data skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CropOutcome {
    Completed { report: CropValidation },
    Skipped { crop: String, reason: String },
}

/// Full validation report across all crops present in the yield table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub countries: Vec<CountryAggregate>,
    pub crops: Vec<CropOutcome>,
}

/// Average location scores up to country level.
///
/// Locations missing from the country map are skipped with a warning.
/// Countries come out in lexical order.
pub fn aggregate_by_country(
    cards: &[ScoreCard],
    countries: &HashMap<String, String>,
) -> Vec<CountryAggregate> {
    let mut grouped: BTreeMap<&str, Vec<&ScoreCard>> = BTreeMap::new();
    for card in cards {
        match countries.get(&card.location) {
            Some(country) => grouped.entry(country.as_str()).or_default().push(card),
            None => warn!("{} has no country mapping, skipped", card.location),
        }
    }
    grouped
        .into_iter()
        .map(|(country, members)| {
            let composites: Vec<f64> = members.iter().map(|card| card.composite).collect();
            let mut components = ComponentScores::default();
            for component in Component::ALL {
                let values: Vec<f64> =
                    members.iter().map(|card| card.raw.get(component)).collect();
                components.set(component, mean(&values).unwrap_or(0.0));
            }
            CountryAggregate {
                country: country.to_string(),
                locations: members.len(),
                composite: mean(&composites).unwrap_or(0.0),
                components,
            }
        })
        .collect()
}

/// Correlate country-level ACVI scores against the external yield table,
/// per crop.
///
/// Each crop needs at least 3 joined countries; fewer produces a skip entry
/// with the reason, never a silent zero. Crops are processed independently.
pub fn validate(
    cards: &[ScoreCard],
    countries: &HashMap<String, String>,
    table: &[YieldVolatility],
) -> ValidationReport {
    let aggregates = aggregate_by_country(cards, countries);

    // crops in order of first appearance
    let mut crops: Vec<&str> = Vec::new();
    for row in table {
        if !crops.contains(&row.crop.as_str()) {
            crops.push(&row.crop);
        }
    }

    let outcomes = crops
        .iter()
        .map(|crop| validate_crop(crop, &aggregates, table))
        .collect();

    ValidationReport {
        countries: aggregates,
        crops: outcomes,
    }
}

fn validate_crop(
    crop: &str,
    aggregates: &[CountryAggregate],
    table: &[YieldVolatility],
) -> CropOutcome {
    let rows: HashMap<&str, &YieldVolatility> = table
        .iter()
        .filter(|row| row.crop == crop)
        .map(|row| (row.country.as_str(), row))
        .collect();
    let joined: Vec<(&CountryAggregate, &YieldVolatility)> = aggregates
        .iter()
        .filter_map(|aggregate| {
            rows.get(aggregate.country.as_str())
                .map(|row| (aggregate, *row))
        })
        .collect();

    if joined.len() < MIN_JOINED_ROWS {
        let reason = AcviError::InsufficientSample {
            context: format!("{crop} yield join"),
            needed: MIN_JOINED_ROWS,
            found: joined.len(),
        };
        info!("validation for {crop} skipped: {reason}");
        return CropOutcome::Skipped {
            crop: crop.to_string(),
            reason: reason.to_string(),
        };
    }

    let samples = joined.len();
    let composites: Vec<f64> = joined.iter().map(|(a, _)| a.composite).collect();
    let metrics: [(&str, Vec<f64>); 2] = [
        (
            "cv_yield",
            joined.iter().map(|(_, row)| row.cv_yield).collect(),
        ),
        (
            "detrended_cv",
            joined.iter().map(|(_, row)| row.detrended_cv).collect(),
        ),
    ];

    let mut composite_correlations = Vec::new();
    let mut component_correlations = Vec::new();
    for (metric, values) in &metrics {
        let r = pearson(&composites, values).unwrap_or(0.0);
        let p_value = pearson_p_value(r, samples);
        info!("{crop}: acvi vs {metric}: r={r:.3}, p={p_value:.4}, n={samples}");
        composite_correlations.push(MetricCorrelation {
            metric: metric.to_string(),
            r,
            p_value,
            significant: p_value < ALPHA,
            samples,
        });
        for component in Component::ALL {
            let component_values: Vec<f64> = joined
                .iter()
                .map(|(aggregate, _)| aggregate.components.get(component))
                .collect();
            let r = pearson(&component_values, values).unwrap_or(0.0);
            component_correlations.push(ComponentMetricCorrelation {
                component,
                metric: metric.to_string(),
                r,
                p_value: pearson_p_value(r, samples),
            });
        }
    }

    CropOutcome::Completed {
        report: CropValidation {
            crop: crop.to_string(),
            samples,
            composite: composite_correlations,
            components: component_correlations,
        },
    }
}
