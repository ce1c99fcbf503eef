//! Spatial change detection between two dataset snapshots.
//!
//! # Architecture
//!
//! Matching runs in two phases:
//!
//! - [`candidates`]: for every after record, query the [`SpatialIndex`] of
//!   before records around its center and score the hits with the configured
//!   [`DifferenceMeasure`]. Read-only, so it runs on the rayon pool for large
//!   inputs.
//! - [`MatchEngine`] resolution: walk the after records in order and assign
//!   statuses through a single [`ChangeTracker`], disambiguating multiple
//!   candidates by attribute equality and the [`FallbackPolicy`].
//!
//! [`SpatialIndex`]: crate::index::SpatialIndex
//! [`DifferenceMeasure`]: crate::geometry::DifferenceMeasure
//!
//! # Example
//!
//! ```ignore
//! use geodiff::diff::MatchEngine;
//!
//! let report = MatchEngine::new().compare(&before, &after)?;
//! for (old, new) in report.update_pairs() {
//!     println!("{old},{new}");
//! }
//! ```

pub mod candidates;
mod engine;
mod engine_config;
mod result;
mod tracker;

pub use candidates::CandidateMatch;
pub use engine::MatchEngine;
pub use engine_config::{DEFAULT_EPSILON, DEFAULT_PARALLEL_THRESHOLD, FallbackPolicy, MatchConfig};
pub use result::{ChangeReport, ChangeSummary, UpdateDetail};
pub use tracker::ChangeTracker;
