//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::diff::FallbackPolicy;
use crate::geometry::DifferenceMeasure;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".geodiff.yaml",
    ".geodiff.yml",
    "geodiff.yaml",
    "geodiff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/geodiff/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir()
        && let Some(path) = find_config_in_dir(&config_dir.join("geodiff"))
    {
        return Some(path);
    }

    None
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
///
/// A discovered file that fails to load is logged and skipped.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Settings given explicitly on the command line.
///
/// Every `Some` value and every `true` flag replaces the file setting, even
/// when it equals the built-in default; `None` and `false` leave it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub measure: Option<DifferenceMeasure>,
    pub epsilon: Option<f64>,
    pub threshold: Option<f64>,
    pub fallback: Option<FallbackPolicy>,
    pub no_parallel: bool,
    pub write_features: bool,
    pub force: bool,
    pub dump_index: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
}

impl AppConfig {
    /// Layer CLI settings over this config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        // Matching config
        if let Some(measure) = overrides.measure {
            self.matching.measure = measure;
        }
        if let Some(epsilon) = overrides.epsilon {
            self.matching.epsilon = epsilon;
        }
        if overrides.threshold.is_some() {
            self.matching.threshold = overrides.threshold;
        }
        if let Some(fallback) = overrides.fallback {
            self.matching.fallback = fallback;
        }
        if overrides.no_parallel {
            self.matching.parallel = false;
        }

        // Output config
        if overrides.write_features {
            self.output.write_features = true;
        }
        if overrides.force {
            self.output.force = true;
        }
        if overrides.dump_index.is_some() {
            self.output.dump_index.clone_from(&overrides.dump_index);
        }

        // Behavior config
        if overrides.verbose {
            self.behavior.verbose = true;
        }
        if overrides.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and apply CLI overrides.
    ///
    /// An explicit path that cannot be loaded is an error; discovered files
    /// fall back to defaults.
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<(Self, Option<PathBuf>), ConfigFileError> {
        let (mut config, loaded_from) = match config_path {
            Some(path) => (load_config_file(path)?, Some(path.to_path_buf())),
            None => load_or_default(None),
        };
        config.apply_overrides(overrides);
        Ok((config, loaded_from))
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# geodiff configuration
# Place this file at .geodiff.yaml in the working directory or
# ~/.config/geodiff/geodiff.yaml for a user-wide default.
#
# CLI arguments always override file settings.

matching:
  # Difference measure: length (line datasets) or area (polygon datasets)
  measure: length
  # Search radius around each after record's center
  epsilon: 0.01
  # Maximum difference score for a match (default: 0.1 for length, 1.0 for area)
  # threshold: 0.1
  # Ambiguous matches: greedy or exclude-claimed
  fallback: greedy
  parallel: true
  parallel_threshold: 256

output:
  # Write deleteds_features/, updateds_features/ and inserteds_features/
  write_features: false
  # Overwrite a non-empty output directory
  force: false
  # dump_index: ./index.json

behavior:
  verbose: false
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
