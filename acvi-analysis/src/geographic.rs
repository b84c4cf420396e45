use crate::ALPHA;
use acvi_core::error::{AcviError, Result};
use acvi_core::stats::{mean, one_way_anova, sample_std};
use acvi_core::ScoreCard;
use log::debug;
use serde::{Deserialize, Serialize};

/// Fixed region table keyed by the country prefix of a location id
/// (the part before the first underscore).
pub const REGIONS: [(&str, &[&str]); 6] = [
    (
        "Europe",
        &["UA", "PL", "DE", "FR", "RO", "HU", "IT", "ES", "NL", "UK", "TR"],
    ),
    ("North America", &["US", "CA"]),
    ("South America", &["BR", "AR"]),
    ("Asia", &["CN", "IN", "KZ"]),
    ("Africa", &["EG", "ZA"]),
    ("Oceania", &["AU"]),
];

/// Region for a location id, or `None` when the prefix is unknown.
pub fn region_for(location_id: &str) -> Option<&'static str> {
    let prefix = location_id.split('_').next().unwrap_or(location_id);
    REGIONS
        .iter()
        .find(|(_, countries)| countries.contains(&prefix))
        .map(|(region, _)| *region)
}

/// Composite-score statistics for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalStats {
    pub region: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
}

/// One-way ANOVA of composite scores across regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnovaReport {
    pub regions: Vec<RegionalStats>,
    pub f_statistic: f64,
    pub p_value: f64,
    /// True when the regional means differ at the 0.05 level — i.e. the
    /// index is confounded by geography.
    pub significant: bool,
}

/// Test whether composite scores differ systematically between regions.
///
/// Locations with an unknown prefix are excluded from the test. Requires at
/// least two non-empty regions; fewer is an explicit insufficient-data
/// skip, not a failure.
pub fn regional_anova(cards: &[ScoreCard]) -> Result<AnovaReport> {
    let mut groups: Vec<(&'static str, Vec<f64>)> = REGIONS
        .iter()
        .map(|(region, _)| (*region, Vec::new()))
        .collect();
    for card in cards {
        match region_for(&card.location) {
            Some(region) => {
                if let Some((_, scores)) = groups.iter_mut().find(|(name, _)| *name == region) {
                    scores.push(card.composite);
                }
            }
            None => debug!("{} has no region, excluded from ANOVA", card.location),
        }
    }
    groups.retain(|(_, scores)| !scores.is_empty());

    if groups.len() < 2 {
        return Err(AcviError::InsufficientSample {
            context: "regional ANOVA".to_string(),
            needed: 2,
            found: groups.len(),
        });
    }

    let regions = groups
        .iter()
        .map(|(region, scores)| RegionalStats {
            region: region.to_string(),
            count: scores.len(),
            mean: mean(scores).unwrap_or(0.0),
            std: sample_std(scores),
        })
        .collect();

    let score_groups: Vec<Vec<f64>> = groups.into_iter().map(|(_, scores)| scores).collect();
    let anova = one_way_anova(&score_groups)?;

    Ok(AnovaReport {
        regions,
        f_statistic: anova.f_statistic,
        p_value: anova.p_value,
        significant: anova.p_value < ALPHA,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acvi_core::{ComponentScores, WeightVector};

    fn card(id: &str, composite: f64) -> ScoreCard {
        ScoreCard {
            location: id.to_string(),
            composite,
            normalized: ComponentScores::default(),
            raw: ComponentScores::default(),
            degraded: Vec::new(),
            weights: WeightVector::default(),
        }
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(region_for("UA_Poltava"), Some("Europe"));
        assert_eq!(region_for("US_Iowa"), Some("North America"));
        assert_eq!(region_for("AU_Victoria"), Some("Oceania"));
        assert_eq!(region_for("XX_Nowhere"), None);
    }

    #[test]
    fn test_separated_regions_are_significant() {
        let cards = vec![
            card("UA_A", 10.0),
            card("UA_B", 11.0),
            card("UA_C", 10.5),
            card("US_A", 60.0),
            card("US_B", 61.0),
            card("US_C", 60.5),
        ];
        let report = regional_anova(&cards).unwrap();
        assert!(report.significant);
        assert!(report.f_statistic > 10.0);
        assert_eq!(report.regions.len(), 2);
    }

    #[test]
    fn test_mixed_regions_are_not_significant() {
        let cards = vec![
            card("UA_A", 10.0),
            card("UA_B", 60.0),
            card("US_A", 11.0),
            card("US_B", 59.0),
        ];
        let report = regional_anova(&cards).unwrap();
        assert!(!report.significant);
    }

    #[test]
    fn test_single_region_is_insufficient() {
        let cards = vec![card("UA_A", 10.0), card("UA_B", 20.0)];
        assert!(matches!(
            regional_anova(&cards),
            Err(AcviError::InsufficientSample { .. })
        ));
    }

    #[test]
    fn test_unknown_prefix_is_excluded() {
        let cards = vec![
            card("UA_A", 10.0),
            card("UA_B", 12.0),
            card("US_A", 50.0),
            card("US_B", 52.0),
            card("XX_Mystery", 1000.0),
        ];
        let report = regional_anova(&cards).unwrap();
        let total: usize = report.regions.iter().map(|r| r.count).sum();
        assert_eq!(total, 4);
    }
}
