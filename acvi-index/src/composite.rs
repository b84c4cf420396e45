use acvi_core::{Component, ComponentScores, WeightVector};

/// Weighted linear combination of the four component scores.
///
/// Pure and scale-agnostic: callers feed it normalized scores for the
/// headline ACVI and raw scores inside the robustness battery. No implicit
/// normalization happens here, so the result is linear in the weights.
pub fn composite_score(scores: &ComponentScores, weights: &WeightVector) -> f64 {
    Component::ALL
        .into_iter()
        .map(|component| weights.get(component) * scores.get(component))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_worked_example() {
        // 0.30*80 + 0.30*60 + 0.25*40 + 0.15*20 = 55.0
        let scores = ComponentScores::new([80.0, 60.0, 40.0, 20.0]);
        let composite = composite_score(&scores, &WeightVector::default());
        assert!((composite - 55.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_in_weights() {
        let scores = ComponentScores::new([12.0, 7.5, 0.0, 44.0]);
        let weights = WeightVector::new([0.4, 0.1, 0.2, 0.3]);
        let base = composite_score(&scores, &weights);
        let tripled = composite_score(&scores, &weights.scaled(3.0));
        assert!((tripled - 3.0 * base).abs() < 1e-9);
    }

    #[test]
    fn test_works_on_raw_and_normalized_scales() {
        let raw = ComponentScores::new([250.0, 3.0, 18.0, 90.0]);
        let weights = WeightVector::equal();
        let expected = (250.0 + 3.0 + 18.0 + 90.0) / 4.0;
        assert!((composite_score(&raw, &weights) - expected).abs() < 1e-12);
    }
}
