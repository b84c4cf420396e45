//! Sub-index calculation, cohort normalization and composite scoring.
//!
//! The flow through this crate is: per-location sub-indices
//! ([`sub_index`]), a cohort-wide robust scaling snapshot ([`normalize`]),
//! the weighted composite ([`composite`]), and the full cohort pass that
//! ties them together ([`pipeline`]).

pub mod composite;
pub mod normalize;
pub mod pipeline;
pub mod sub_index;

pub use composite::composite_score;
pub use normalize::CohortNormalization;
pub use pipeline::{score_cohort, CohortOutcome, IndexConfig, RejectedLocation};
