//! External validation of the ACVI against yield-volatility ground truth.
//!
//! Location scores are aggregated to country level and correlated, per
//! crop, with an independent table of yield-volatility metrics supplied by
//! an external collaborator.

pub mod correlate;
pub mod yield_data;

pub use correlate::{validate, CropOutcome, ValidationReport};
pub use yield_data::{volatility_from_series, YieldVolatility};
