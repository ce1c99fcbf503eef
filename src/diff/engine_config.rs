//! Configuration types for the match engine.

use crate::error::{GeoDiffError, Result};
use crate::geometry::DifferenceMeasure;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default search radius around an after record's center.
pub const DEFAULT_EPSILON: f64 = 0.01;

/// Default number of after records from which candidate search runs in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// How the multi-candidate branch picks a pair when no unclaimed,
/// attribute-equal candidate exists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Pair with the best-scoring candidate even if an earlier after record
    /// already claimed it. Several after records may map to one before record.
    #[default]
    Greedy,
    /// Ignore candidates already claimed by an earlier after record, keeping
    /// the before/after pairing one-to-one.
    ExcludeClaimed,
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::ExcludeClaimed => write!(f, "exclude-claimed"),
        }
    }
}

/// Parameters of one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Measure used to score candidate pairs
    pub measure: DifferenceMeasure,
    /// Search radius around each after record's center
    pub epsilon: f64,
    /// Maximum score for a candidate to stay eligible (inclusive)
    pub threshold: f64,
    /// Tie-breaking policy for ambiguous matches
    pub fallback: FallbackPolicy,
    /// Compute candidate sets on the rayon pool
    pub parallel: bool,
    /// Minimum number of after records before going parallel
    pub parallel_threshold: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::for_measure(DifferenceMeasure::default())
    }
}

impl MatchConfig {
    /// Defaults for `measure`, using its natural threshold.
    #[must_use]
    pub const fn for_measure(measure: DifferenceMeasure) -> Self {
        Self {
            measure,
            epsilon: DEFAULT_EPSILON,
            threshold: measure.default_threshold(),
            fallback: FallbackPolicy::Greedy,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Line datasets: symmetric-difference length, threshold 0.1.
    #[must_use]
    pub const fn lines() -> Self {
        Self::for_measure(DifferenceMeasure::Length)
    }

    /// Polygon datasets: symmetric-difference area, threshold 1.0.
    #[must_use]
    pub const fn polygons() -> Self {
        Self::for_measure(DifferenceMeasure::Area)
    }

    /// Reject parameters the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GeoDiffError::validation(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(GeoDiffError::validation(format!(
                "threshold must be a non-negative finite number, got {}",
                self.threshold
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(GeoDiffError::validation(
                "parallel_threshold must be at least 1",
            ));
        }
        Ok(())
    }
}
