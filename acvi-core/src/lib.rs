//! Core data model and statistics primitives for the ACVI toolkit.
//!
//! This crate defines the types shared by every other ACVI crate: the daily
//! climate [`TimeSeries`](series::TimeSeries), the four index
//! [`Component`](scores::Component)s and their score containers, weight
//! vectors, and the plain statistics functions (CV, percentiles, rank
//! correlation, ANOVA) that the index and analysis crates build on.

pub mod coverage;
pub mod error;
pub mod location;
pub mod parameter;
pub mod scores;
pub mod series;
pub mod stats;

pub use coverage::ParameterCoverage;
pub use error::{AcviError, Result};
pub use location::LocationRecord;
pub use parameter::Parameter;
pub use scores::{Component, ComponentScores, ScoreCard, SubIndexSet, WeightVector};
pub use series::TimeSeries;
