//! Configuration types for geodiff runs.
//!
//! Provides structured configuration for the diff command, loadable from CLI
//! args, YAML files, or both.

use crate::diff::{DEFAULT_EPSILON, DEFAULT_PARALLEL_THRESHOLD, FallbackPolicy, MatchConfig};
use crate::geometry::DifferenceMeasure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::apply_overrides`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Matching configuration (measure, epsilon, threshold, fallback)
    pub matching: MatchingConfig,
    /// Output configuration (feature files, overwrite, index dump)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn measure(mut self, measure: DifferenceMeasure) -> Self {
        self.config.matching.measure = measure;
        self
    }

    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.matching.epsilon = epsilon;
        self
    }

    pub const fn threshold(mut self, threshold: Option<f64>) -> Self {
        self.config.matching.threshold = threshold;
        self
    }

    pub const fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.config.matching.fallback = fallback;
        self
    }

    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.matching.parallel = parallel;
        self
    }

    pub const fn write_features(mut self, write: bool) -> Self {
        self.config.output.write_features = write;
        self
    }

    pub const fn force(mut self, force: bool) -> Self {
        self.config.output.force = force;
        self
    }

    pub fn dump_index(mut self, path: Option<PathBuf>) -> Self {
        self.config.output.dump_index = path;
        self
    }

    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.behavior.verbose = verbose;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command Configuration
// ============================================================================

/// Fully resolved configuration for one diff run.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Input and output locations
    pub paths: DiffPaths,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
    pub behavior: BehaviorConfig,
}

/// Paths for a diff run
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// Before-set dataset file
    pub before: PathBuf,
    /// After-set dataset file
    pub after: PathBuf,
    /// Directory receiving the result files
    pub output_dir: PathBuf,
}

impl DiffConfig {
    /// Combine paths with an application config.
    #[must_use]
    pub fn new(paths: DiffPaths, config: AppConfig) -> Self {
        Self {
            paths,
            matching: config.matching,
            output: config.output,
            behavior: config.behavior,
        }
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Difference measure: length (line datasets) or area (polygon datasets)
    pub measure: DifferenceMeasure,
    /// Search radius around each after record's center
    pub epsilon: f64,
    /// Custom similarity threshold (defaults to the measure's threshold)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Tie-breaking policy for ambiguous matches
    pub fallback: FallbackPolicy,
    /// Compute candidate sets in parallel for large inputs
    pub parallel: bool,
    /// Minimum number of after records before going parallel
    pub parallel_threshold: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            measure: DifferenceMeasure::Length,
            epsilon: DEFAULT_EPSILON,
            threshold: None,
            fallback: FallbackPolicy::Greedy,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl MatchingConfig {
    /// Similarity threshold in effect.
    #[must_use]
    pub fn effective_threshold(&self) -> f64 {
        self.threshold
            .unwrap_or_else(|| self.measure.default_threshold())
    }

    /// Convert to the engine's run parameters.
    #[must_use]
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            measure: self.measure,
            epsilon: self.epsilon,
            threshold: self.effective_threshold(),
            fallback: self.fallback,
            parallel: self.parallel,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Also write full feature files for deleted, updated and inserted records
    pub write_features: bool,
    /// Overwrite a non-empty output directory
    pub force: bool,
    /// Write the before-set index partitions as JSON to this path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_index: Option<PathBuf>,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Print the summary line and enable debug logging
    pub verbose: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}
