//! Plain statistics over `f64` slices.
//!
//! Conventions used throughout the toolkit:
//! - the coefficient of variation uses the sample standard deviation (n-1);
//! - summary statistics over scenario/trial collections use the population
//!   standard deviation (n);
//! - percentiles interpolate linearly between order statistics
//!   (rank = q/100 * (n-1));
//! - Spearman assigns average ranks to ties.

use crate::error::{AcviError, Result};
use std::cmp::Ordering;

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n-1 denominator); 0.0 for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Population standard deviation (n denominator); 0.0 when empty.
pub fn population_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / n as f64).sqrt()
}

/// Coefficient of variation: 100 * sample std / |mean|.
///
/// Defined as 0.0 when the mean is 0, undefined, or there are fewer than
/// two values.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    match mean(values) {
        Some(m) if m != 0.0 && m.is_finite() => 100.0 * sample_std(values) / m.abs(),
        _ => 0.0,
    }
}

/// q-th percentile (0-100) with linear interpolation between order
/// statistics. `None` when empty.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let fraction = rank - lo as f64;
    Some(sorted[lo] + fraction * (sorted[hi] - sorted[lo]))
}

/// Pearson correlation coefficient.
///
/// `None` when the slices differ in length, have fewer than 2 values, or
/// either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// Two-sided p-value for a Pearson correlation under the t distribution
/// with n-2 degrees of freedom. Returns 1.0 when the test is undefined
/// (n < 3), 0.0 for |r| = 1.
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let r2 = r * r;
    if r2 >= 1.0 {
        return 0.0;
    }
    let dof = (n - 2) as f64;
    let t = r * (dof / (1.0 - r2)).sqrt();
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// 1-based ranks with ties assigned their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let average = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = average;
        }
        i = j + 1;
    }
    ranks
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

/// Least-squares line over x = 0, 1, ..., n-1. Returns (slope, intercept);
/// `None` for fewer than 2 values.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mx = (nf - 1.0) / 2.0;
    let my = values.iter().sum::<f64>() / nf;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, v) in values.iter().enumerate() {
        let dx = i as f64 - mx;
        sxy += dx * (v - my);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}

/// Root-mean-square difference of two aligned score vectors.
pub fn rmse(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let ss: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    (ss / a.len() as f64).sqrt()
}

/// One-way ANOVA result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
}

/// One-way ANOVA across groups of observations.
///
/// Requires at least 2 non-empty groups and at least one within-group
/// degree of freedom. Zero within-group variance yields an infinite F and
/// p = 0.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<AnovaResult> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    if k < 2 {
        return Err(AcviError::InsufficientSample {
            context: "one-way ANOVA groups".to_string(),
            needed: 2,
            found: k,
        });
    }
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if n <= k {
        return Err(AcviError::InsufficientSample {
            context: "one-way ANOVA observations".to_string(),
            needed: k + 1,
            found: n,
        });
    }
    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let gm = group.iter().sum::<f64>() / group.len() as f64;
        ss_between += group.len() as f64 * (gm - grand_mean) * (gm - grand_mean);
        ss_within += group.iter().map(|v| (v - gm) * (v - gm)).sum::<f64>();
    }
    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    if ss_within == 0.0 {
        return Ok(AnovaResult {
            f_statistic: f64::INFINITY,
            p_value: 0.0,
        });
    }
    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| AcviError::Computation(format!("F distribution: {e}")))?;
    Ok(AnovaResult {
        f_statistic: f,
        p_value: (1.0 - dist.cdf(f)).clamp(0.0, 1.0),
    })
}
