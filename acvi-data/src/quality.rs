use acvi_core::error::{AcviError, Result};
use acvi_core::{LocationRecord, Parameter, ParameterCoverage, TimeSeries};

/// A required parameter may be at most this fraction missing.
pub const MISSING_LIMIT: f64 = 0.30;

/// Screen a location's raw series before any processing.
///
/// Rejects the location when a required parameter (temperature,
/// precipitation, soil moisture) is absent or more than 30% missing. A
/// rejection excludes the location from all downstream steps; the caller
/// logs it and continues with the rest of the cohort.
pub fn screen(location: &LocationRecord) -> Result<ParameterCoverage> {
    let coverage = ParameterCoverage::from(&location.series);
    for parameter in Parameter::REQUIRED {
        match coverage.missing_fraction(parameter) {
            None => {
                return Err(AcviError::MissingParameter {
                    location: location.id.clone(),
                    parameter: parameter.as_str().to_string(),
                })
            }
            Some(fraction) if fraction > MISSING_LIMIT => {
                return Err(AcviError::ExcessiveMissing {
                    location: location.id.clone(),
                    parameter: parameter.as_str().to_string(),
                    percent_missing: fraction * 100.0,
                    limit: MISSING_LIMIT * 100.0,
                })
            }
            Some(_) => {}
        }
    }
    Ok(coverage)
}

/// Replace values outside each base parameter's physical limits with
/// missing, so sensor glitches never reach the derived fields.
pub fn apply_physical_limits(series: &TimeSeries) -> Result<TimeSeries> {
    let mut cleaned = series.clone();
    let parameters: Vec<Parameter> = series.parameters().collect();
    for parameter in parameters {
        let Some((low, high)) = parameter.physical_limits() else {
            continue;
        };
        let Some(column) = series.column(parameter) else {
            continue;
        };
        let values = column
            .iter()
            .map(|v| v.filter(|x| *x >= low && *x <= high))
            .collect();
        cleaned.insert_column(parameter, values)?;
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn full_column(n: usize, value: f64) -> Vec<Option<f64>> {
        vec![Some(value); n]
    }

    fn location_with(series: TimeSeries) -> LocationRecord {
        LocationRecord::new("US_Iowa", 41.9, -93.5, series)
    }

    #[test]
    fn test_screen_rejects_missing_required_parameter() {
        let mut series = TimeSeries::new(daily_dates(10)).unwrap();
        series
            .insert_column(Parameter::Temperature, full_column(10, 20.0))
            .unwrap();
        series
            .insert_column(Parameter::Precipitation, full_column(10, 2.0))
            .unwrap();
        // no soil moisture
        let result = screen(&location_with(series));
        assert!(matches!(
            result,
            Err(AcviError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_screen_rejects_excessive_missing() {
        let mut series = TimeSeries::new(daily_dates(10)).unwrap();
        series
            .insert_column(Parameter::Temperature, full_column(10, 20.0))
            .unwrap();
        let mut precip = full_column(10, 2.0);
        for slot in precip.iter_mut().take(4) {
            *slot = None; // 40% missing
        }
        series.insert_column(Parameter::Precipitation, precip).unwrap();
        series
            .insert_column(Parameter::SoilMoisture, full_column(10, 0.5))
            .unwrap();
        let result = screen(&location_with(series));
        assert!(matches!(
            result,
            Err(AcviError::ExcessiveMissing { .. })
        ));
    }

    #[test]
    fn test_screen_accepts_complete_series() {
        let mut series = TimeSeries::new(daily_dates(10)).unwrap();
        series
            .insert_column(Parameter::Temperature, full_column(10, 20.0))
            .unwrap();
        series
            .insert_column(Parameter::Precipitation, full_column(10, 2.0))
            .unwrap();
        series
            .insert_column(Parameter::SoilMoisture, full_column(10, 0.5))
            .unwrap();
        let coverage = screen(&location_with(series)).unwrap();
        assert!(coverage.has(Parameter::SoilMoisture));
    }

    #[test]
    fn test_physical_limits_blank_impossible_values() {
        let mut series = TimeSeries::new(daily_dates(3)).unwrap();
        series
            .insert_column(
                Parameter::Temperature,
                vec![Some(20.0), Some(999.0), Some(-80.0)],
            )
            .unwrap();
        let cleaned = apply_physical_limits(&series).unwrap();
        assert_eq!(
            cleaned.column(Parameter::Temperature),
            Some(&[Some(20.0), None, None][..])
        );
    }
}
