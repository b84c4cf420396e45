use acvi_core::error::{AcviError, Result};
use acvi_core::stats::{linear_fit, mean, population_std};
use serde::{Deserialize, Serialize};

/// One row of the external yield-volatility table: a country-crop pair with
/// its mean yield and two volatility metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldVolatility {
    pub country: String,
    pub crop: String,
    pub mean_yield: f64,
    /// Coefficient of variation of the yearly yields.
    pub cv_yield: f64,
    /// CV after removing the linear trend over time, so steady
    /// intensification gains do not read as volatility.
    pub detrended_cv: f64,
}

/// Build a volatility row from a raw yearly yield series.
///
/// Detrending subtracts the least-squares line over the year index before
/// taking the standard deviation; both CVs divide by the untrended mean.
/// Requires at least 3 years of data.
pub fn volatility_from_series(country: &str, crop: &str, yields: &[f64]) -> Result<YieldVolatility> {
    if yields.len() < 3 {
        return Err(AcviError::InsufficientSample {
            context: format!("{country}/{crop} yield series"),
            needed: 3,
            found: yields.len(),
        });
    }
    let mean_yield = mean(yields).unwrap_or(0.0);
    if mean_yield <= 0.0 {
        return Ok(YieldVolatility {
            country: country.to_string(),
            crop: crop.to_string(),
            mean_yield,
            cv_yield: 0.0,
            detrended_cv: 0.0,
        });
    }
    let cv_yield = 100.0 * population_std(yields) / mean_yield;
    let (slope, intercept) = linear_fit(yields).ok_or_else(|| {
        AcviError::Computation(format!("trend fit for {country}/{crop}"))
    })?;
    let residuals: Vec<f64> = yields
        .iter()
        .enumerate()
        .map(|(year, value)| value - (slope * year as f64 + intercept))
        .collect();
    let detrended_cv = 100.0 * population_std(&residuals) / mean_yield;
    Ok(YieldVolatility {
        country: country.to_string(),
        crop: crop.to_string(),
        mean_yield,
        cv_yield,
        detrended_cv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_trend_detrends_to_zero() {
        // A perfectly linear yield climb has volatility only before
        // detrending
        let yields = [2.0, 2.5, 3.0, 3.5, 4.0];
        let row = volatility_from_series("UA", "wheat", &yields).unwrap();
        assert!(row.cv_yield > 20.0);
        assert!(row.detrended_cv.abs() < 1e-9);
    }

    #[test]
    fn test_constant_yields_have_no_volatility() {
        let row = volatility_from_series("DE", "maize", &[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(row.cv_yield, 0.0);
        assert_eq!(row.detrended_cv, 0.0);
    }

    #[test]
    fn test_needs_three_years() {
        assert!(volatility_from_series("FR", "wheat", &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_alternating_series_keeps_volatility_after_detrending() {
        let yields = [3.0, 5.0, 3.0, 5.0, 3.0, 5.0];
        let row = volatility_from_series("AR", "maize", &yields).unwrap();
        assert!(row.detrended_cv > 20.0);
    }
}
