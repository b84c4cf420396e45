//! Per-location series processing for the ACVI toolkit.
//!
//! This crate turns a raw daily [`TimeSeries`](acvi_core::TimeSeries) into
//! the form the index calculation consumes: quality-screened, stripped of
//! physically impossible values, augmented with derived fields (degree-days,
//! vapor pressure deficit, dry/heat/frost flags) and filtered to the
//! configured growing season.

pub mod crop;
pub mod derive;
pub mod quality;
pub mod season;
pub mod yearly;

pub use crop::{Crop, CropThresholds};
pub use season::GrowingSeason;
