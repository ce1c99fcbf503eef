//! **Change detection between two snapshots of a vector geographic dataset.**
//!
//! `geodiff` compares a "before" and an "after" collection of geometric
//! records and classifies every record of both as unchanged, updated,
//! deleted or inserted. It powers the `geodiff` command-line tool and can be
//! embedded as a library.
//!
//! ## How matching works
//!
//! 1. Every before record starts out deleted. Their geometry centers go into
//!    a point quadtree ([`index`]).
//! 2. For each after record, the index is queried within an epsilon window
//!    around its center. Hits are scored by the length (or area) of the
//!    symmetric difference with the after geometry, and those within the
//!    similarity threshold become candidates.
//! 3. No candidate: inserted. One candidate: unchanged or updated depending
//!    on attribute equality. Several: the best unclaimed attribute-equal
//!    candidate wins, otherwise the best-scoring one is paired as updated
//!    under the configured [`FallbackPolicy`].
//!
//! ## Core modules
//!
//! - **[`model`]**: [`Dataset`], [`GeometryRecord`], [`Envelope`] and [`ChangeStatus`].
//! - **[`index`]**: the [`SpatialIndex`] trait, [`PointQuadTree`] and its [`LeafPartition`] leaves.
//! - **[`diff`]**: the [`MatchEngine`] and its [`ChangeReport`].
//! - **[`parsers`]** / **[`reports`]**: the JSON dataset format and result files.
//! - **[`pipeline`]**: load → compare → write, as the CLI runs it.
//!
//! ## Comparing two datasets
//!
//! ```no_run
//! use std::path::Path;
//! use geodiff::{MatchEngine, load_dataset};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let before = load_dataset(Path::new("roads-2023.json"))?;
//!     let after = load_dataset(Path::new("roads-2024.json"))?;
//!
//!     let report = MatchEngine::new().compare(&before, &after)?;
//!     for (old, new) in report.update_pairs() {
//!         println!("{old} -> {new}");
//!     }
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod index;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, Validatable};
pub use config::{BehaviorConfig, DiffConfig, MatchingConfig, OutputConfig};
pub use diff::{ChangeReport, ChangeSummary, FallbackPolicy, MatchConfig, MatchEngine};
pub use error::{ErrorContext, GeoDiffError, OptionContext, Result};
pub use geometry::{DifferenceMeasure, GeometryType};
pub use index::{LeafPartition, PointQuadTree, SpatialIndex};
pub use model::{ChangeStatus, Dataset, Envelope, Feature, GeometryRecord};
pub use parsers::{load_dataset, parse_dataset_str};
pub use reports::write_dataset;
