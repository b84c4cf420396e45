/// Error types for the ACVI toolkit
use thiserror::Error;

/// Main error type for ACVI operations.
///
/// Data-quality failures exclude a single location; insufficient-sample and
/// computation failures are local to one diagnostic. None of these abort a
/// full cohort run.
#[derive(Error, Debug)]
pub enum AcviError {
    /// A required climate parameter is absent from a location's series
    #[error("location {location}: required parameter '{parameter}' is missing")]
    MissingParameter { location: String, parameter: String },

    /// A required parameter has too many missing values
    #[error("location {location}: '{parameter}' is {percent_missing:.1}% missing (limit {limit:.0}%)")]
    ExcessiveMissing {
        location: String,
        parameter: String,
        percent_missing: f64,
        limit: f64,
    },

    /// Series dates are not strictly increasing
    #[error("series dates must be strictly increasing (violation at record {index})")]
    UnorderedSeries { index: usize },

    /// A parameter column does not match the series date axis
    #[error("column '{parameter}' has {got} values, series has {expected} dates")]
    ColumnLength {
        parameter: String,
        expected: usize,
        got: usize,
    },

    /// Not enough data for a statistical test or join
    #[error("insufficient data for {context} (needed {needed}, found {found})")]
    InsufficientSample {
        context: String,
        needed: usize,
        found: usize,
    },

    /// A numerical computation failed (e.g. singular regression matrix)
    #[error("computation failed: {0}")]
    Computation(String),
}

/// Type alias for Results using AcviError
pub type Result<T> = std::result::Result<T, AcviError>;
