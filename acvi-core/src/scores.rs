use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The four sub-indices that make up the composite ACVI score.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    TemperatureVolatility,
    PrecipitationVolatility,
    MoistureStress,
    ExtremeEvents,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::TemperatureVolatility,
        Component::PrecipitationVolatility,
        Component::MoistureStress,
        Component::ExtremeEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::TemperatureVolatility => "temperature_volatility",
            Component::PrecipitationVolatility => "precipitation_volatility",
            Component::MoistureStress => "moisture_stress",
            Component::ExtremeEvents => "extreme_events",
        }
    }

    /// Look up a component by its snake_case name.
    pub fn from_name(name: &str) -> Option<Component> {
        Component::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Position of this component in [`Component::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Component::TemperatureVolatility => 0,
            Component::PrecipitationVolatility => 1,
            Component::MoistureStress => 2,
            Component::ExtremeEvents => 3,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per component, ordered as [`Component::ALL`].
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentScores([f64; 4]);

impl ComponentScores {
    pub const fn new(values: [f64; 4]) -> Self {
        ComponentScores(values)
    }

    pub fn get(&self, component: Component) -> f64 {
        self.0[component.index()]
    }

    pub fn set(&mut self, component: Component, value: f64) {
        self.0[component.index()] = value;
    }

    pub fn as_array(&self) -> [f64; 4] {
        self.0
    }
}

impl From<[f64; 4]> for ComponentScores {
    fn from(values: [f64; 4]) -> Self {
        ComponentScores(values)
    }
}

/// Raw sub-index scores for one location.
///
/// Raw scores live on unbounded, component-specific scales (percentages,
/// counts, CVs) and are not comparable across components until the cohort
/// normalization step. A component computed from zero available signals is
/// 0.0 and flagged as degraded.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SubIndexSet {
    scores: ComponentScores,
    degraded: [bool; 4],
}

impl SubIndexSet {
    pub fn new(scores: ComponentScores, degraded: [bool; 4]) -> Self {
        SubIndexSet { scores, degraded }
    }

    pub fn score(&self, component: Component) -> f64 {
        self.scores.get(component)
    }

    pub fn scores(&self) -> &ComponentScores {
        &self.scores
    }

    pub fn is_degraded(&self, component: Component) -> bool {
        self.degraded[component.index()]
    }

    pub fn degraded_components(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| self.degraded[c.index()])
            .collect()
    }
}

/// Non-negative per-component weights.
///
/// Weights need not sum to 1 for raw aggregation; the canonical default and
/// the named scenario battery use vectors that do. Scenario vectors never
/// mutate the default.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct WeightVector([f64; 4]);

impl WeightVector {
    pub const fn new(weights: [f64; 4]) -> Self {
        WeightVector(weights)
    }

    /// Equal weights across all four components.
    pub const fn equal() -> Self {
        WeightVector([0.25; 4])
    }

    pub fn get(&self, component: Component) -> f64 {
        self.0[component.index()]
    }

    pub fn as_array(&self) -> [f64; 4] {
        self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Rescaled copy whose weights sum to 1. A zero vector is returned
    /// unchanged.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total == 0.0 {
            return *self;
        }
        WeightVector([
            self.0[0] / total,
            self.0[1] / total,
            self.0[2] / total,
            self.0[3] / total,
        ])
    }

    pub fn scaled(&self, factor: f64) -> Self {
        WeightVector([
            self.0[0] * factor,
            self.0[1] * factor,
            self.0[2] * factor,
            self.0[3] * factor,
        ])
    }
}

impl Default for WeightVector {
    /// Canonical ACVI weights: temperature 0.30, precipitation 0.30,
    /// moisture 0.25, extreme events 0.15.
    fn default() -> Self {
        WeightVector([0.30, 0.30, 0.25, 0.15])
    }
}

/// Structured scoring result for one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    pub location: String,
    /// Composite ACVI score from the normalized components.
    pub composite: f64,
    /// Components on the cohort-normalized 0-100 scale.
    pub normalized: ComponentScores,
    /// Components on their raw, component-specific scales.
    pub raw: ComponentScores,
    /// Components that defaulted to 0 for lack of input signals.
    pub degraded: Vec<Component>,
    pub weights: WeightVector,
}

/// Location ids ordered by descending score.
///
/// Ties keep the input order (stable sort), which is the documented
/// deterministic tie-break.
pub fn rank_by_score(pairs: &[(String, f64)]) -> Vec<String> {
    let mut ordered: Vec<&(String, f64)> = pairs.iter().collect();
    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ordered.iter().map(|(id, _)| id.clone()).collect()
}

/// Ranking over a slice of score cards.
pub trait RankByComposite {
    fn ranking(&self) -> Vec<String>;
}

impl RankByComposite for [ScoreCard] {
    fn ranking(&self) -> Vec<String> {
        let pairs: Vec<(String, f64)> = self
            .iter()
            .map(|card| (card.location.clone(), card.composite))
            .collect();
        rank_by_score(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = WeightVector::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert_eq!(weights.get(Component::MoistureStress), 0.25);
    }

    #[test]
    fn test_normalized_weights() {
        let weights = WeightVector::new([2.0, 2.0, 2.0, 2.0]).normalized();
        assert_eq!(weights.as_array(), [0.25; 4]);
    }

    #[test]
    fn test_rank_by_score_stable_tie_break() {
        let pairs = vec![
            ("a".to_string(), 10.0),
            ("b".to_string(), 30.0),
            ("c".to_string(), 10.0),
        ];
        // b first, then a before c because a appeared first in the input
        assert_eq!(rank_by_score(&pairs), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_degraded_components() {
        let set = SubIndexSet::new(
            ComponentScores::new([1.0, 0.0, 3.0, 0.0]),
            [false, true, false, true],
        );
        assert_eq!(
            set.degraded_components(),
            vec![Component::PrecipitationVolatility, Component::ExtremeEvents]
        );
        assert!(!set.is_degraded(Component::TemperatureVolatility));
    }
}
