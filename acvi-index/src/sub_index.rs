use acvi_core::stats::{coefficient_of_variation, mean};
use acvi_core::{Component, ComponentScores, Parameter, ParameterCoverage, SubIndexSet, TimeSeries};
use acvi_data::yearly::{exceedance_frequency, values_of, yearly_mean, yearly_sum};

/// Mean VPD at which moisture stress saturates, in kPa.
pub const VPD_STRESS_THRESHOLD: f64 = 2.5;

/// Annual heat/frost/dry day counts at which the extreme-events signals
/// saturate at 100.
pub const HEAT_DAYS_FULL_SCALE: f64 = 30.0;
pub const FROST_DAYS_FULL_SCALE: f64 = 20.0;
pub const DRY_DAYS_FULL_SCALE: f64 = 90.0;

/// Percentile of the max-wind distribution above which a value counts as an
/// extreme wind event.
pub const EXTREME_WIND_PERCENTILE: f64 = 95.0;

/// Compute the four raw sub-indices for one prepared location series
/// (cleaned, derived fields appended, growing-season filtered).
///
/// Each sub-index is the arithmetic mean of its available signals; signal
/// availability is decided once against the coverage record. A sub-index
/// with no available signals is 0.0 and flagged as degraded.
pub fn compute_sub_indices(series: &TimeSeries, coverage: &ParameterCoverage) -> SubIndexSet {
    let mut scores = ComponentScores::default();
    let mut degraded = [false; 4];
    for component in Component::ALL {
        let signals = match component {
            Component::TemperatureVolatility => temperature_signals(series, coverage),
            Component::PrecipitationVolatility => precipitation_signals(series, coverage),
            Component::MoistureStress => moisture_signals(series, coverage),
            Component::ExtremeEvents => extreme_signals(series, coverage),
        };
        match mean(&signals) {
            Some(value) => scores.set(component, value),
            None => {
                scores.set(component, 0.0);
                degraded[component.index()] = true;
            }
        }
    }
    SubIndexSet::new(scores, degraded)
}

fn yearly_mean_cv(series: &TimeSeries, parameter: Parameter) -> f64 {
    coefficient_of_variation(&values_of(&yearly_mean(series, parameter)))
}

fn temperature_signals(series: &TimeSeries, coverage: &ParameterCoverage) -> Vec<f64> {
    let mut signals = Vec::new();
    if coverage.has(Parameter::TemperatureRange) {
        signals.push(yearly_mean_cv(series, Parameter::TemperatureRange));
    }
    if coverage.has(Parameter::Temperature) {
        signals.push(yearly_mean_cv(series, Parameter::Temperature));
    }
    if coverage.has(Parameter::HeatDay) {
        // share of days above the heat-stress threshold
        if let Some(fraction) = mean(&series.present(Parameter::HeatDay)) {
            signals.push(100.0 * fraction);
        }
    }
    if coverage.has(Parameter::DegreeDays) {
        signals.push(yearly_mean_cv(series, Parameter::DegreeDays));
    }
    signals
}

fn precipitation_signals(series: &TimeSeries, coverage: &ParameterCoverage) -> Vec<f64> {
    let mut signals = Vec::new();
    if coverage.has(Parameter::Precipitation) {
        signals.push(yearly_mean_cv(series, Parameter::Precipitation));
        signals.push(coefficient_of_variation(&values_of(&yearly_sum(
            series,
            Parameter::Precipitation,
        ))));
    }
    if coverage.has(Parameter::DrySpellLength) {
        let spells = series.present(Parameter::DrySpellLength);
        if !spells.is_empty() {
            signals.push(spells.iter().fold(f64::MIN, |a, b| a.max(*b)));
        }
    }
    signals
}

fn moisture_signals(series: &TimeSeries, coverage: &ParameterCoverage) -> Vec<f64> {
    let mut signals = Vec::new();
    if coverage.has(Parameter::SoilMoisture) {
        if let Some(moisture) = mean(&series.present(Parameter::SoilMoisture)) {
            signals.push(100.0 * (1.0 - moisture));
        }
        signals.push(yearly_mean_cv(series, Parameter::SoilMoisture));
    }
    if coverage.has(Parameter::VaporPressureDeficit) {
        if let Some(vpd) = mean(&series.present(Parameter::VaporPressureDeficit)) {
            signals.push((100.0 * vpd / VPD_STRESS_THRESHOLD).min(100.0));
        }
    }
    if coverage.has(Parameter::Evapotranspiration) {
        signals.push(yearly_mean_cv(series, Parameter::Evapotranspiration));
    }
    signals
}

fn extreme_signals(series: &TimeSeries, coverage: &ParameterCoverage) -> Vec<f64> {
    let mut signals = Vec::new();
    let mut annual_flag_signal = |parameter: Parameter, full_scale: f64| {
        if coverage.has(parameter) {
            if let Some(days_per_year) = mean(&values_of(&yearly_sum(series, parameter))) {
                signals.push((100.0 * days_per_year / full_scale).min(100.0));
            }
        }
    };
    annual_flag_signal(Parameter::HeatDay, HEAT_DAYS_FULL_SCALE);
    annual_flag_signal(Parameter::FrostDay, FROST_DAYS_FULL_SCALE);
    annual_flag_signal(Parameter::DryDay, DRY_DAYS_FULL_SCALE);
    if coverage.has(Parameter::MaxWind) {
        signals.push(100.0 * exceedance_frequency(series, Parameter::MaxWind, EXTREME_WIND_PERCENTILE));
    }
    if coverage.has(Parameter::SolarRadiation) {
        signals.push(yearly_mean_cv(series, Parameter::SolarRadiation));
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use acvi_data::crop::CropThresholds;
    use acvi_data::derive::append_derived_fields;
    use chrono::NaiveDate;

    fn daily_series(days: usize, start: (i32, u32, u32)) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        let dates = (0..days)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        TimeSeries::new(dates).unwrap()
    }

    #[test]
    fn test_all_components_degraded_on_empty_series() {
        let series = daily_series(10, (2020, 5, 1));
        let coverage = ParameterCoverage::from(&series);
        let set = compute_sub_indices(&series, &coverage);
        for component in Component::ALL {
            assert_eq!(set.score(component), 0.0);
            assert!(set.is_degraded(component));
        }
    }

    #[test]
    fn test_zero_variance_precipitation_scores_zero() {
        // Two equal-length growing seasons of identical rain: every
        // precipitation signal is 0
        let mut dates = Vec::new();
        for year in [2020, 2021] {
            let start = NaiveDate::from_ymd_opt(year, 4, 1).unwrap();
            for day in 0..183 {
                dates.push(start + chrono::Duration::days(day));
            }
        }
        let mut series = TimeSeries::new(dates).unwrap();
        series
            .insert_column(Parameter::Precipitation, vec![Some(5.0); 366])
            .unwrap();
        let derived = append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        let coverage = ParameterCoverage::from(&derived);
        let set = compute_sub_indices(&derived, &coverage);
        assert_eq!(set.score(Component::PrecipitationVolatility), 0.0);
        assert!(!set.is_degraded(Component::PrecipitationVolatility));
    }

    #[test]
    fn test_moisture_stress_from_constant_moisture() {
        let mut series = daily_series(730, (2020, 1, 1));
        series
            .insert_column(Parameter::SoilMoisture, vec![Some(0.4); 730])
            .unwrap();
        let coverage = ParameterCoverage::from(&series);
        let set = compute_sub_indices(&series, &coverage);
        // deficit signal 100*(1-0.4)=60, yearly CV signal 0 -> mean 30
        assert!((set.score(Component::MoistureStress) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_dry_spell_maximum_feeds_precipitation_volatility() {
        let mut series = daily_series(6, (2020, 5, 1));
        series
            .insert_column(
                Parameter::Precipitation,
                vec![
                    Some(0.0),
                    Some(0.0),
                    Some(0.0),
                    Some(5.0),
                    Some(0.0),
                    Some(5.0),
                ],
            )
            .unwrap();
        let derived = append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        let coverage = ParameterCoverage::from(&derived);
        let set = compute_sub_indices(&derived, &coverage);
        // one year only: both CV signals are 0, max dry spell is 3 -> mean 1.0
        assert!((set.score(Component::PrecipitationVolatility) - 1.0).abs() < 1e-9);
    }
}
