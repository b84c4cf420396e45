use crate::crop::CropThresholds;
use acvi_core::error::Result;
use acvi_core::{Parameter, TimeSeries};

/// Days with less precipitation than this count as dry.
pub const DRY_DAY_PRECIP: f64 = 1.0;

/// Saturation vapor pressure in kPa at temperature `t` (degrees Celsius),
/// Tetens formula.
fn saturation_vapor_pressure(t: f64) -> f64 {
    0.6108 * ((17.27 * t) / (t + 237.3)).exp()
}

/// Append the derived fields to a cleaned series: degree-days, vapor
/// pressure deficit, dry-day flag and running dry-spell length, heat-day
/// and frost-day flags.
///
/// Derived fields are computed once, here; nothing downstream re-derives
/// them. Conventions:
/// - degree-days and VPD are missing on days where their inputs are missing;
/// - the dry/heat/frost flags are 0 on days without evidence (missing
///   inputs), so flag sums count only observed events;
/// - the daily max/min behind the heat/frost flags is reconstructed as
///   temperature +/- half the diurnal range, or the mean temperature alone
///   when the range is absent.
pub fn append_derived_fields(series: &TimeSeries, thresholds: &CropThresholds) -> Result<TimeSeries> {
    let mut out = series.clone();

    if let Some(temperature) = series.column(Parameter::Temperature) {
        let degree_days = temperature
            .iter()
            .map(|t| t.map(|t| (t - thresholds.base_temp).max(0.0)))
            .collect();
        out.insert_column(Parameter::DegreeDays, degree_days)?;

        if let Some(humidity) = series.column(Parameter::Humidity) {
            let vpd = temperature
                .iter()
                .zip(humidity.iter())
                .map(|(t, rh)| match (t, rh) {
                    (Some(t), Some(rh)) => {
                        let es = saturation_vapor_pressure(*t);
                        let ea = (rh / 100.0) * es;
                        Some(es - ea)
                    }
                    _ => None,
                })
                .collect();
            out.insert_column(Parameter::VaporPressureDeficit, vpd)?;
        }

        let range = series.column(Parameter::TemperatureRange);
        let mut heat_days = Vec::with_capacity(series.len());
        let mut frost_days = Vec::with_capacity(series.len());
        for (i, t) in temperature.iter().enumerate() {
            let half_range = range
                .and_then(|r| r[i])
                .map(|r| r / 2.0)
                .unwrap_or(0.0);
            let (heat, frost) = match t {
                Some(t) => (
                    t + half_range > thresholds.heat_stress_temp,
                    t - half_range < thresholds.frost_temp,
                ),
                None => (false, false),
            };
            heat_days.push(Some(if heat { 1.0 } else { 0.0 }));
            frost_days.push(Some(if frost { 1.0 } else { 0.0 }));
        }
        out.insert_column(Parameter::HeatDay, heat_days)?;
        out.insert_column(Parameter::FrostDay, frost_days)?;
    }

    if let Some(precipitation) = series.column(Parameter::Precipitation) {
        let mut dry_days = Vec::with_capacity(series.len());
        let mut spell_lengths = Vec::with_capacity(series.len());
        let mut run = 0.0;
        for p in precipitation {
            let dry = p.map(|v| v < DRY_DAY_PRECIP).unwrap_or(false);
            if dry {
                run += 1.0;
            } else {
                run = 0.0;
            }
            dry_days.push(Some(if dry { 1.0 } else { 0.0 }));
            spell_lengths.push(Some(run));
        }
        out.insert_column(Parameter::DryDay, dry_days)?;
        out.insert_column(Parameter::DrySpellLength, spell_lengths)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_with(columns: &[(Parameter, Vec<Option<f64>>)]) -> TimeSeries {
        let n = columns[0].1.len();
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let dates = (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let mut series = TimeSeries::new(dates).unwrap();
        for (parameter, values) in columns {
            series.insert_column(*parameter, values.clone()).unwrap();
        }
        series
    }

    #[test]
    fn test_degree_days_floor_at_zero() {
        let series = series_with(&[(
            Parameter::Temperature,
            vec![Some(15.0), Some(5.0), None],
        )]);
        let derived =
            append_derived_fields(&series, &CropThresholds::maize()).unwrap();
        // maize base temperature is 10
        assert_eq!(
            derived.column(Parameter::DegreeDays),
            Some(&[Some(5.0), Some(0.0), None][..])
        );
    }

    #[test]
    fn test_vapor_pressure_deficit_zero_at_saturation() {
        let series = series_with(&[
            (Parameter::Temperature, vec![Some(25.0), Some(25.0)]),
            (Parameter::Humidity, vec![Some(100.0), Some(50.0)]),
        ]);
        let derived =
            append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        let vpd = derived.column(Parameter::VaporPressureDeficit).unwrap();
        assert!(vpd[0].unwrap().abs() < 1e-9);
        // es at 25C is ~3.17 kPa, so half of it remains as deficit
        assert!((vpd[1].unwrap() - 1.584).abs() < 0.01);
    }

    #[test]
    fn test_dry_spell_resets_on_wet_day() {
        let series = series_with(&[(
            Parameter::Precipitation,
            vec![Some(0.0), Some(0.5), Some(5.0), None, Some(0.2)],
        )]);
        let derived =
            append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        assert_eq!(
            derived.column(Parameter::DryDay),
            Some(&[Some(1.0), Some(1.0), Some(0.0), Some(0.0), Some(1.0)][..])
        );
        assert_eq!(
            derived.column(Parameter::DrySpellLength),
            Some(&[Some(1.0), Some(2.0), Some(0.0), Some(0.0), Some(1.0)][..])
        );
    }

    #[test]
    fn test_heat_and_frost_flags_use_diurnal_range() {
        let series = series_with(&[
            (Parameter::Temperature, vec![Some(26.0), Some(4.0)]),
            (Parameter::TemperatureRange, vec![Some(10.0), Some(10.0)]),
        ]);
        let derived =
            append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        // 26 + 5 = 31 > 30 -> heat day; 4 - 5 = -1 < 0 -> frost day
        assert_eq!(
            derived.column(Parameter::HeatDay),
            Some(&[Some(1.0), Some(0.0)][..])
        );
        assert_eq!(
            derived.column(Parameter::FrostDay),
            Some(&[Some(0.0), Some(1.0)][..])
        );
    }

    #[test]
    fn test_flags_without_range_use_mean_temperature() {
        let series = series_with(&[(
            Parameter::Temperature,
            vec![Some(31.0), Some(-1.0), None],
        )]);
        let derived =
            append_derived_fields(&series, &CropThresholds::wheat()).unwrap();
        assert_eq!(
            derived.column(Parameter::HeatDay),
            Some(&[Some(1.0), Some(0.0), Some(0.0)][..])
        );
        assert_eq!(
            derived.column(Parameter::FrostDay),
            Some(&[Some(0.0), Some(1.0), Some(0.0)][..])
        );
    }
}
