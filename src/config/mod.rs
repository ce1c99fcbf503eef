//! Configuration module for geodiff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for line and polygon datasets
//! - YAML config file loading and discovery
//! - CLI argument overrides
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use geodiff::config::{AppConfig, ConfigPreset};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Polygons);
//!
//! let config = AppConfig::builder()
//!     .epsilon(0.05)
//!     .write_features(true)
//!     .build();
//!
//! use geodiff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.geodiff.yaml` file in the working directory or `~/.config/geodiff/`:
//!
//! ```yaml
//! matching:
//!   measure: area
//!   epsilon: 0.05
//!   fallback: exclude-claimed
//! output:
//!   write_features: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, DiffPaths, MatchingConfig,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, ConfigOverrides, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.geodiff.yaml` config files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema();
        assert!(schema.contains("matching"));
        assert!(schema.contains("exclude-claimed"));
    }
}
