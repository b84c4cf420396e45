//! Calendar-year aggregation of daily series.

use acvi_core::stats::{percentile, sample_std};
use acvi_core::{Parameter, TimeSeries};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Mean of the non-missing values in each calendar year.
///
/// Years with no observed values are skipped. Results are ordered by year.
pub fn yearly_mean(series: &TimeSeries, parameter: Parameter) -> Vec<(i32, f64)> {
    let Some(column) = series.column(parameter) else {
        return Vec::new();
    };
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for (date, value) in series.dates().iter().zip(column.iter()) {
        if let Some(v) = value {
            let entry = buckets.entry(date.year()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(year, (sum, count))| (year, sum / count as f64))
        .collect()
}

/// Sum of the non-missing values in each calendar year the series covers.
///
/// Every year with records appears, with sum 0.0 when all values are
/// missing; this keeps flag counts (heat days, dry days) honest across
/// sparse years.
pub fn yearly_sum(series: &TimeSeries, parameter: Parameter) -> Vec<(i32, f64)> {
    let Some(column) = series.column(parameter) else {
        return Vec::new();
    };
    let mut buckets: BTreeMap<i32, f64> = BTreeMap::new();
    for (date, value) in series.dates().iter().zip(column.iter()) {
        *buckets.entry(date.year()).or_insert(0.0) += value.unwrap_or(0.0);
    }
    buckets.into_iter().collect()
}

/// Strip the years off a yearly aggregate.
pub fn values_of(pairs: &[(i32, f64)]) -> Vec<f64> {
    pairs.iter().map(|(_, v)| *v).collect()
}

/// Sample standard deviation of the yearly means — how much a parameter
/// swings from one year to the next.
pub fn interannual_variability(series: &TimeSeries, parameter: Parameter) -> f64 {
    sample_std(&values_of(&yearly_mean(series, parameter)))
}

/// Fraction of observed values strictly above the q-th percentile of the
/// parameter's own distribution. 0.0 when the column is absent or empty.
pub fn exceedance_frequency(series: &TimeSeries, parameter: Parameter, q: f64) -> f64 {
    let values = series.present(parameter);
    let Some(threshold) = percentile(&values, q) else {
        return 0.0;
    };
    values.iter().filter(|v| **v > threshold).count() as f64 / values.len() as f64
}
