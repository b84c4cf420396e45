use acvi_core::error::{AcviError, Result};
use acvi_core::stats::percentile;
use acvi_core::{Component, ComponentScores, SubIndexSet};
use serde::{Deserialize, Serialize};

/// Robust scaling anchors.
pub const LOWER_PERCENTILE: f64 = 5.0;
pub const UPPER_PERCENTILE: f64 = 95.0;

/// Normalized value assigned to every location when a component has no
/// variance across the cohort.
pub const DEGENERATE_SCORE: f64 = 50.0;

/// Immutable robust-scaling snapshot for one cohort pass.
///
/// Holds the 5th/95th percentile of each component's raw values across the
/// full surviving cohort. A snapshot is fitted from scratch on every cohort
/// pass and threaded through scoring by value, so stale parameters from a
/// previous cohort cannot leak in. Percentiles interpolate linearly between
/// order statistics.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CohortNormalization {
    bounds: [(f64, f64); 4],
}

impl CohortNormalization {
    /// Fit the snapshot from the raw sub-indices of every surviving
    /// location. Fails on an empty cohort.
    pub fn fit(cohort: &[SubIndexSet]) -> Result<Self> {
        if cohort.is_empty() {
            return Err(AcviError::InsufficientSample {
                context: "cohort normalization".to_string(),
                needed: 1,
                found: 0,
            });
        }
        let mut bounds = [(0.0, 0.0); 4];
        for component in Component::ALL {
            let values: Vec<f64> = cohort.iter().map(|set| set.score(component)).collect();
            let low = percentile(&values, LOWER_PERCENTILE).ok_or_else(|| {
                AcviError::Computation(format!("percentile of {component} values"))
            })?;
            let high = percentile(&values, UPPER_PERCENTILE).ok_or_else(|| {
                AcviError::Computation(format!("percentile of {component} values"))
            })?;
            bounds[component.index()] = (low, high);
        }
        Ok(CohortNormalization { bounds })
    }

    /// The (p5, p95) anchors for a component.
    pub fn bounds(&self, component: Component) -> (f64, f64) {
        self.bounds[component.index()]
    }

    /// Scale one raw component value to [0, 100].
    ///
    /// Degenerate components (p95 == p5) map every location to 50.0.
    pub fn normalize_value(&self, component: Component, raw: f64) -> f64 {
        let (low, high) = self.bounds(component);
        if high == low {
            return DEGENERATE_SCORE;
        }
        (100.0 * (raw - low) / (high - low)).clamp(0.0, 100.0)
    }

    /// Scale a location's full raw sub-index set.
    pub fn normalize(&self, raw: &SubIndexSet) -> ComponentScores {
        let mut scores = ComponentScores::default();
        for component in Component::ALL {
            scores.set(component, self.normalize_value(component, raw.score(component)));
        }
        scores
    }
}
