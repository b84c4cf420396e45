use acvi_core::error::{AcviError, Result};
use acvi_core::stats::pearson;
use acvi_core::{Component, ScoreCard};
use log::warn;
use serde::{Deserialize, Serialize};

/// Pairwise correlation above which a component pair is flagged.
pub const HIGH_CORRELATION: f64 = 0.7;

/// VIF reported when the regression is near-perfectly collinear.
pub const VIF_CAP: f64 = 999.99;

/// R-squared at which the VIF is capped instead of computed.
pub const VIF_CAP_R_SQUARED: f64 = 0.9999;

/// A component pair with |r| above the flag threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentPair {
    pub first: Component,
    pub second: Component,
    pub r: f64,
}

/// Variance inflation factor of one component regressed on the other three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VifScore {
    pub component: Component,
    pub vif: f64,
}

/// Overall multicollinearity verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollinearityAssessment {
    Excellent,
    Good,
    Moderate,
}

impl CollinearityAssessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollinearityAssessment::Excellent => "EXCELLENT",
            CollinearityAssessment::Good => "GOOD",
            CollinearityAssessment::Moderate => "MODERATE",
        }
    }
}

/// Multicollinearity diagnostic over the raw sub-index components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollinearityReport {
    /// Pearson correlation between raw components, indexed by
    /// [`Component::index`].
    pub correlation_matrix: [[f64; 4]; 4],
    pub high_correlations: Vec<ComponentPair>,
    pub vif_scores: Vec<VifScore>,
    /// Components whose regression failed; the rest of the diagnostic is
    /// unaffected.
    pub failed_regressions: Vec<String>,
    pub assessment: CollinearityAssessment,
}

impl CollinearityReport {
    /// Largest computed VIF, or the cap when every regression failed.
    pub fn max_vif(&self) -> f64 {
        if self.vif_scores.is_empty() {
            return VIF_CAP;
        }
        self.vif_scores
            .iter()
            .map(|score| score.vif)
            .fold(f64::MIN, f64::max)
    }
}

/// Pairwise correlations and variance inflation factors of the four raw
/// components across the cohort.
pub fn multicollinearity(cards: &[ScoreCard]) -> Result<CollinearityReport> {
    if cards.len() < 2 {
        return Err(AcviError::InsufficientSample {
            context: "multicollinearity".to_string(),
            needed: 2,
            found: cards.len(),
        });
    }

    let columns: [Vec<f64>; 4] = Component::ALL.map(|component| {
        cards
            .iter()
            .map(|card| card.raw.get(component))
            .collect::<Vec<f64>>()
    });

    let mut matrix = [[1.0; 4]; 4];
    let mut high_correlations = Vec::new();
    for first in Component::ALL {
        for second in Component::ALL {
            if second.index() <= first.index() {
                continue;
            }
            let r = pearson(&columns[first.index()], &columns[second.index()]).unwrap_or(0.0);
            matrix[first.index()][second.index()] = r;
            matrix[second.index()][first.index()] = r;
            if r.abs() > HIGH_CORRELATION {
                high_correlations.push(ComponentPair { first, second, r });
            }
        }
    }

    let mut vif_scores = Vec::new();
    let mut failed_regressions = Vec::new();
    for component in Component::ALL {
        match vif_for(&columns, component) {
            Ok(vif) => vif_scores.push(VifScore { component, vif }),
            Err(error) => {
                warn!("VIF for {component} failed: {error}");
                failed_regressions.push(format!("{component}: {error}"));
            }
        }
    }

    let max_vif = vif_scores
        .iter()
        .map(|score| score.vif)
        .fold(f64::MIN, f64::max);
    let max_correlation = high_correlations
        .iter()
        .map(|pair| pair.r.abs())
        .fold(0.0, f64::max);
    let assessment = if vif_scores.is_empty() {
        CollinearityAssessment::Moderate
    } else if max_vif < 5.0 && max_correlation < 0.7 {
        CollinearityAssessment::Excellent
    } else if max_vif < 10.0 && max_correlation < 0.8 {
        CollinearityAssessment::Good
    } else {
        CollinearityAssessment::Moderate
    };

    Ok(CollinearityReport {
        correlation_matrix: matrix,
        high_correlations,
        vif_scores,
        failed_regressions,
        assessment,
    })
}

/// VIF = 1 / (1 - R^2) of `target` regressed on the other three components,
/// capped at 999.99 when R^2 is essentially 1.
fn vif_for(columns: &[Vec<f64>; 4], target: Component) -> Result<f64> {
    let y = &columns[target.index()];
    let regressors: Vec<usize> = Component::ALL
        .into_iter()
        .filter(|c| *c != target)
        .map(|c| c.index())
        .collect();
    let rows: Vec<[f64; 3]> = (0..y.len())
        .map(|i| {
            [
                columns[regressors[0]][i],
                columns[regressors[1]][i],
                columns[regressors[2]][i],
            ]
        })
        .collect();
    let r_squared = ols_r_squared(&rows, y)?;
    if r_squared >= VIF_CAP_R_SQUARED {
        return Ok(VIF_CAP);
    }
    Ok((1.0 / (1.0 - r_squared)).max(1.0))
}

/// R-squared of an ordinary least squares fit with intercept, via the
/// normal equations. 0.0 when the target has no variance.
fn ols_r_squared(rows: &[[f64; 3]], y: &[f64]) -> Result<f64> {
    let mut xtx = [[0.0; 4]; 4];
    let mut xty = [0.0; 4];
    for (row, &value) in rows.iter().zip(y.iter()) {
        let design = [1.0, row[0], row[1], row[2]];
        for i in 0..4 {
            xty[i] += design[i] * value;
            for j in 0..4 {
                xtx[i][j] += design[i] * design[j];
            }
        }
    }
    let beta = solve4(xtx, xty)?;
    let mean_y = y.iter().sum::<f64>() / y.len() as f64;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (row, &value) in rows.iter().zip(y.iter()) {
        let fitted = beta[0] + beta[1] * row[0] + beta[2] * row[1] + beta[3] * row[2];
        sse += (value - fitted) * (value - fitted);
        sst += (value - mean_y) * (value - mean_y);
    }
    if sst == 0.0 {
        return Ok(0.0);
    }
    Ok((1.0 - sse / sst).clamp(0.0, 1.0))
}

/// Solve a 4x4 linear system by Gaussian elimination with partial pivoting.
fn solve4(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Result<[f64; 4]> {
    for pivot in 0..4 {
        let mut best = pivot;
        for row in pivot + 1..4 {
            if a[row][pivot].abs() > a[best][pivot].abs() {
                best = row;
            }
        }
        if a[best][pivot].abs() < 1e-12 {
            return Err(AcviError::Computation(
                "singular normal equations in VIF regression".to_string(),
            ));
        }
        a.swap(pivot, best);
        b.swap(pivot, best);
        for row in pivot + 1..4 {
            let factor = a[row][pivot] / a[pivot][pivot];
            for column in pivot..4 {
                a[row][column] -= factor * a[pivot][column];
            }
            b[row] -= factor * b[pivot];
        }
    }
    let mut x = [0.0; 4];
    for row in (0..4).rev() {
        let mut sum = b[row];
        for column in row + 1..4 {
            sum -= a[row][column] * x[column];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acvi_core::{ComponentScores, WeightVector};

    fn card(id: &str, raw: [f64; 4]) -> ScoreCard {
        let raw = ComponentScores::new(raw);
        ScoreCard {
            location: id.to_string(),
            composite: 0.0,
            normalized: raw,
            raw,
            degraded: Vec::new(),
            weights: WeightVector::default(),
        }
    }

    /// Eight cards whose components follow orthogonal sign patterns, so all
    /// pairwise correlations are exactly zero.
    fn orthogonal_cohort() -> Vec<ScoreCard> {
        let signs = [
            [1.0, 1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0, 1.0],
            [-1.0, -1.0, -1.0, -1.0],
        ];
        signs
            .iter()
            .enumerate()
            .map(|(i, s)| {
                card(
                    &format!("loc{i}"),
                    [
                        50.0 + 10.0 * s[0],
                        40.0 + 8.0 * s[1],
                        30.0 + 6.0 * s[2],
                        20.0 + 4.0 * s[3],
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn test_orthogonal_components_are_excellent() {
        let report = multicollinearity(&orthogonal_cohort()).unwrap();
        assert!(report.high_correlations.is_empty());
        assert_eq!(report.assessment, CollinearityAssessment::Excellent);
        for score in &report.vif_scores {
            assert!((score.vif - 1.0).abs() < 1e-6, "{}", score.component);
        }
    }

    #[test]
    fn test_vif_is_at_least_one() {
        let cards = vec![
            card("a", [10.0, 20.0, 5.0, 40.0]),
            card("b", [15.0, 22.0, 9.0, 35.0]),
            card("c", [9.0, 31.0, 7.0, 30.0]),
            card("d", [21.0, 18.0, 12.0, 45.0]),
            card("e", [13.0, 27.0, 3.0, 38.0]),
            card("f", [18.0, 24.0, 10.0, 33.0]),
        ];
        let report = multicollinearity(&cards).unwrap();
        for score in &report.vif_scores {
            assert!(score.vif >= 1.0);
        }
    }

    #[test]
    fn test_duplicated_component_caps_vif() {
        // Second component is an exact affine copy of the first
        let cards: Vec<ScoreCard> = (0..8)
            .map(|i| {
                let base = 10.0 + 7.0 * i as f64;
                card(
                    &format!("loc{i}"),
                    [base, 2.0 * base + 1.0, (i as f64).sin() * 20.0 + 30.0, 80.0 - 5.0 * i as f64],
                )
            })
            .collect();
        let report = multicollinearity(&cards).unwrap();
        assert_eq!(report.assessment, CollinearityAssessment::Moderate);
        assert!(report
            .high_correlations
            .iter()
            .any(|pair| (pair.r.abs() - 1.0).abs() < 1e-9));
        let capped = report
            .vif_scores
            .iter()
            .filter(|score| score.vif == VIF_CAP)
            .count();
        assert!(capped >= 2);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let report = multicollinearity(&orthogonal_cohort()).unwrap();
        for i in 0..4 {
            assert_eq!(report.correlation_matrix[i][i], 1.0);
            for j in 0..4 {
                assert_eq!(
                    report.correlation_matrix[i][j],
                    report.correlation_matrix[j][i]
                );
            }
        }
    }
}
