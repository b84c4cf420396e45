use crate::composite::composite_score;
use crate::normalize::CohortNormalization;
use crate::sub_index::compute_sub_indices;
use acvi_core::error::Result;
use acvi_core::scores::RankByComposite;
use acvi_core::{LocationRecord, ParameterCoverage, ScoreCard, SubIndexSet, WeightVector};
use acvi_data::crop::Crop;
use acvi_data::derive::append_derived_fields;
use acvi_data::quality::{apply_physical_limits, screen};
use acvi_data::season::{filter_growing_season, GrowingSeason};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Configuration for one cohort scoring pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexConfig {
    pub season: GrowingSeason,
    pub crop: Crop,
    pub weights: WeightVector,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            season: GrowingSeason::default(),
            crop: Crop::Wheat,
            weights: WeightVector::default(),
        }
    }
}

/// A location excluded by quality screening, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedLocation {
    pub location: String,
    pub reason: String,
}

/// Result of a full cohort pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortOutcome {
    pub cards: Vec<ScoreCard>,
    /// Location ids by descending composite score; ties keep input order.
    pub ranking: Vec<String>,
    pub rejected: Vec<RejectedLocation>,
}

/// Score a full cohort: screen each location, derive and filter its series,
/// compute raw sub-indices, fit the normalization snapshot over the
/// survivors, and produce composite score cards plus the ranking.
///
/// Per-location failures exclude that location and are reported in
/// `rejected`; the pass only fails as a whole when no location survives.
/// The snapshot is fitted once, after the surviving cohort is frozen, and
/// never reused across passes.
pub fn score_cohort(locations: &[LocationRecord], config: &IndexConfig) -> Result<CohortOutcome> {
    let thresholds = config.crop.thresholds();
    let mut rejected = Vec::new();
    let mut surviving: Vec<(String, SubIndexSet)> = Vec::new();

    for location in locations {
        if let Err(error) = screen(location) {
            warn!("excluding {}: {}", location.id, error);
            rejected.push(RejectedLocation {
                location: location.id.clone(),
                reason: error.to_string(),
            });
            continue;
        }
        let prepared = apply_physical_limits(&location.series)
            .and_then(|cleaned| append_derived_fields(&cleaned, &thresholds))
            .map(|derived| filter_growing_season(&derived, &config.season));
        let seasonal = match prepared {
            Ok(series) => series,
            Err(error) => {
                warn!("excluding {}: {}", location.id, error);
                rejected.push(RejectedLocation {
                    location: location.id.clone(),
                    reason: error.to_string(),
                });
                continue;
            }
        };
        let coverage = ParameterCoverage::from(&seasonal);
        surviving.push((location.id.clone(), compute_sub_indices(&seasonal, &coverage)));
    }

    let raw_sets: Vec<SubIndexSet> = surviving.iter().map(|(_, set)| *set).collect();
    let snapshot = CohortNormalization::fit(&raw_sets)?;

    let cards: Vec<ScoreCard> = surviving
        .iter()
        .map(|(id, raw)| {
            let normalized = snapshot.normalize(raw);
            ScoreCard {
                location: id.clone(),
                composite: composite_score(&normalized, &config.weights),
                normalized,
                raw: *raw.scores(),
                degraded: raw.degraded_components(),
                weights: config.weights,
            }
        })
        .collect();

    let ranking = cards.ranking();
    info!(
        "scored {} locations ({} rejected)",
        cards.len(),
        rejected.len()
    );
    Ok(CohortOutcome {
        cards,
        ranking,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acvi_core::{Component, Parameter, TimeSeries};
    use chrono::NaiveDate;

    /// Two growing seasons of daily data with a per-year temperature offset
    /// and an alternating precipitation pattern of the given amplitude.
    fn synthetic_location(id: &str, temp_step: f64, rain_amplitude: f64) -> LocationRecord {
        let mut dates = Vec::new();
        let mut temperature = Vec::new();
        let mut precipitation = Vec::new();
        let mut moisture = Vec::new();
        for (year_index, year) in [2020, 2021, 2022].into_iter().enumerate() {
            let start = NaiveDate::from_ymd_opt(year, 4, 1).unwrap();
            for day in 0..180 {
                let date = start + chrono::Duration::days(day);
                dates.push(date);
                temperature.push(Some(18.0 + temp_step * year_index as f64));
                let rain = if day % 2 == 0 {
                    4.0 + rain_amplitude * year_index as f64
                } else {
                    4.0
                };
                precipitation.push(Some(rain));
                moisture.push(Some(0.55));
            }
        }
        let mut series = TimeSeries::new(dates).unwrap();
        series
            .insert_column(Parameter::Temperature, temperature)
            .unwrap();
        series
            .insert_column(Parameter::Precipitation, precipitation)
            .unwrap();
        series
            .insert_column(Parameter::SoilMoisture, moisture)
            .unwrap();
        LocationRecord::new(id, 50.0, 30.0, series)
    }

    fn bare_location(id: &str) -> LocationRecord {
        let dates = vec![NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()];
        LocationRecord::new(id, 0.0, 0.0, TimeSeries::new(dates).unwrap())
    }

    #[test]
    fn test_cohort_pass_scores_and_ranks() {
        let locations = vec![
            synthetic_location("UA_Calm", 0.1, 0.1),
            synthetic_location("UA_Mid", 1.0, 1.0),
            synthetic_location("UA_Wild", 3.0, 3.0),
        ];
        let outcome = score_cohort(&locations, &IndexConfig::default()).unwrap();
        assert_eq!(outcome.cards.len(), 3);
        assert!(outcome.rejected.is_empty());
        for card in &outcome.cards {
            for component in Component::ALL {
                let value = card.normalized.get(component);
                assert!((0.0..=100.0).contains(&value), "{component}: {value}");
            }
        }
        // The most volatile location leads the ranking
        assert_eq!(outcome.ranking[0], "UA_Wild");
        assert_eq!(outcome.ranking[2], "UA_Calm");
    }

    #[test]
    fn test_rejected_location_is_isolated() {
        let locations = vec![
            synthetic_location("UA_Calm", 0.1, 0.1),
            bare_location("UA_Empty"),
            synthetic_location("UA_Wild", 3.0, 3.0),
        ];
        let outcome = score_cohort(&locations, &IndexConfig::default()).unwrap();
        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].location, "UA_Empty");
        assert!(!outcome.ranking.contains(&"UA_Empty".to_string()));
    }

    #[test]
    fn test_all_rejected_fails_the_pass() {
        let locations = vec![bare_location("A"), bare_location("B")];
        assert!(score_cohort(&locations, &IndexConfig::default()).is_err());
    }

    #[test]
    fn test_identical_locations_hit_degenerate_fallback() {
        // Identical series: every component is degenerate across the cohort,
        // so both locations normalize to 50 everywhere.
        let locations = vec![
            synthetic_location("UA_Twin1", 1.0, 1.0),
            synthetic_location("UA_Twin2", 1.0, 1.0),
        ];
        let outcome = score_cohort(&locations, &IndexConfig::default()).unwrap();
        for card in &outcome.cards {
            for component in Component::ALL {
                assert_eq!(card.normalized.get(component), 50.0);
            }
            assert!((card.composite - 50.0).abs() < 1e-9);
        }
        // Tie broken by input order
        assert_eq!(outcome.ranking, vec!["UA_Twin1", "UA_Twin2"]);
    }
}
