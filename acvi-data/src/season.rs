use acvi_core::error::{AcviError, Result};
use acvi_core::TimeSeries;
use chrono::Datelike;
use log::warn;
use serde::{Deserialize, Serialize};

/// Growing-season month range, inclusive on both ends.
///
/// When `start_month > end_month` the season wraps across year-end, e.g.
/// (10, 3) covers October through March.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct GrowingSeason {
    start_month: u32,
    end_month: u32,
}

impl GrowingSeason {
    pub fn new(start_month: u32, end_month: u32) -> Result<Self> {
        if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
            return Err(AcviError::Computation(format!(
                "growing season months must be 1-12, got {start_month}-{end_month}"
            )));
        }
        Ok(GrowingSeason {
            start_month,
            end_month,
        })
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    pub fn end_month(&self) -> u32 {
        self.end_month
    }

    pub fn contains(&self, month: u32) -> bool {
        if self.start_month <= self.end_month {
            month >= self.start_month && month <= self.end_month
        } else {
            month >= self.start_month || month <= self.end_month
        }
    }
}

impl Default for GrowingSeason {
    /// April through September, the Northern-Hemisphere spring-summer season
    /// for wheat and maize.
    fn default() -> Self {
        GrowingSeason {
            start_month: 4,
            end_month: 9,
        }
    }
}

/// Keep only records whose month falls inside the growing season.
///
/// If the filter would leave nothing (a series entirely outside the season),
/// the full series is used instead so the location still gets scored.
pub fn filter_growing_season(series: &TimeSeries, season: &GrowingSeason) -> TimeSeries {
    let filtered = series.filter_dates(|date| season.contains(date.month()));
    if filtered.is_empty() && !series.is_empty() {
        warn!(
            "growing season {}-{} leaves no records, falling back to the full series",
            season.start_month, season.end_month
        );
        return series.clone();
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use acvi_core::Parameter;
    use chrono::NaiveDate;

    #[test]
    fn test_season_contains() {
        let season = GrowingSeason::default();
        assert!(season.contains(4));
        assert!(season.contains(9));
        assert!(!season.contains(10));
        assert!(!season.contains(3));
    }

    #[test]
    fn test_season_wraps_year_end() {
        let season = GrowingSeason::new(10, 3).unwrap();
        assert!(season.contains(10));
        assert!(season.contains(12));
        assert!(season.contains(1));
        assert!(season.contains(3));
        assert!(!season.contains(4));
        assert!(!season.contains(9));
    }

    #[test]
    fn test_invalid_months_rejected() {
        assert!(GrowingSeason::new(0, 9).is_err());
        assert!(GrowingSeason::new(4, 13).is_err());
    }

    #[test]
    fn test_filter_falls_back_when_empty() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
        ];
        let mut series = TimeSeries::new(dates).unwrap();
        series
            .insert_column(Parameter::Temperature, vec![Some(1.0), Some(2.0)])
            .unwrap();
        // Entire series sits outside April-September
        let filtered = filter_growing_season(&series, &GrowingSeason::default());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_selects_season_months() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
            NaiveDate::from_ymd_opt(2020, 10, 1).unwrap(),
        ];
        let series = TimeSeries::new(dates).unwrap();
        let filtered = filter_growing_season(&series, &GrowingSeason::default());
        assert_eq!(filtered.len(), 2);
    }
}
