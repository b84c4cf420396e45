use crate::error::{AcviError, Result};
use crate::parameter::Parameter;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Daily climate time series for one location, stored column-wise.
///
/// The date axis is strictly increasing; gaps in a parameter are `None`
/// entries, never omitted dates. Parameter columns always have the same
/// length as the date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<Parameter, Vec<Option<f64>>>,
}

impl TimeSeries {
    /// Create an empty series over the given date axis.
    ///
    /// Fails if the dates are not strictly increasing.
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self> {
        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(AcviError::UnorderedSeries { index: index + 1 });
            }
        }
        Ok(TimeSeries {
            dates,
            columns: BTreeMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Parameters present in this series, in a fixed order.
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.columns.keys().copied()
    }

    pub fn has(&self, parameter: Parameter) -> bool {
        self.columns.contains_key(&parameter)
    }

    pub fn column(&self, parameter: Parameter) -> Option<&[Option<f64>]> {
        self.columns.get(&parameter).map(|v| v.as_slice())
    }

    /// Insert (or replace) a parameter column.
    ///
    /// Fails if the column length does not match the date axis.
    pub fn insert_column(&mut self, parameter: Parameter, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.dates.len() {
            return Err(AcviError::ColumnLength {
                parameter: parameter.as_str().to_string(),
                expected: self.dates.len(),
                got: values.len(),
            });
        }
        self.columns.insert(parameter, values);
        Ok(())
    }

    /// All non-missing values of a parameter, in date order.
    pub fn present(&self, parameter: Parameter) -> Vec<f64> {
        match self.columns.get(&parameter) {
            Some(column) => column.iter().filter_map(|v| *v).collect(),
            None => Vec::new(),
        }
    }

    /// Fraction of missing entries in a parameter column.
    ///
    /// `None` when the column is absent; an empty series counts as fully
    /// missing.
    pub fn missing_fraction(&self, parameter: Parameter) -> Option<f64> {
        let column = self.columns.get(&parameter)?;
        if column.is_empty() {
            return Some(1.0);
        }
        let missing = column.iter().filter(|v| v.is_none()).count();
        Some(missing as f64 / column.len() as f64)
    }

    /// New series containing only the records whose date satisfies `keep`.
    ///
    /// Column membership is preserved; the subset keeps date order.
    pub fn filter_dates<F>(&self, keep: F) -> TimeSeries
    where
        F: Fn(NaiveDate) -> bool,
    {
        let selected: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, date)| keep(**date))
            .map(|(i, _)| i)
            .collect();
        let dates = selected.iter().map(|&i| self.dates[i]).collect();
        let mut columns = BTreeMap::new();
        for (parameter, column) in &self.columns {
            let values = selected.iter().map(|&i| column[i]).collect();
            columns.insert(*parameter, values);
        }
        TimeSeries { dates, columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn dates(pairs: &[(i32, u32, u32)]) -> Vec<NaiveDate> {
        pairs
            .iter()
            .map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .collect()
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let result = TimeSeries::new(dates(&[(2020, 1, 2), (2020, 1, 1)]));
        assert!(matches!(
            result,
            Err(AcviError::UnorderedSeries { index: 1 })
        ));
    }

    #[test]
    fn test_column_length_must_match() {
        let mut series = TimeSeries::new(dates(&[(2020, 1, 1), (2020, 1, 2)])).unwrap();
        let short = vec![Some(1.0)];
        assert!(series
            .insert_column(Parameter::Temperature, short)
            .is_err());
    }

    #[test]
    fn test_missing_fraction_and_present() {
        let mut series =
            TimeSeries::new(dates(&[(2020, 1, 1), (2020, 1, 2), (2020, 1, 3), (2020, 1, 4)]))
                .unwrap();
        series
            .insert_column(
                Parameter::Precipitation,
                vec![Some(2.0), None, Some(0.5), None],
            )
            .unwrap();
        assert_eq!(series.missing_fraction(Parameter::Precipitation), Some(0.5));
        assert_eq!(series.present(Parameter::Precipitation), vec![2.0, 0.5]);
        assert_eq!(series.missing_fraction(Parameter::Temperature), None);
    }

    #[test]
    fn test_filter_dates_keeps_columns() {
        let mut series =
            TimeSeries::new(dates(&[(2020, 4, 1), (2020, 10, 1), (2021, 4, 1)])).unwrap();
        series
            .insert_column(
                Parameter::Temperature,
                vec![Some(10.0), Some(5.0), Some(12.0)],
            )
            .unwrap();
        let spring = series.filter_dates(|d| d.month() == 4);
        assert_eq!(spring.len(), 2);
        assert_eq!(
            spring.column(Parameter::Temperature),
            Some(&[Some(10.0), Some(12.0)][..])
        );
    }
}
