//! Configuration validation for geodiff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, DiffConfig, MatchingConfig, OutputConfig};
use crate::error::GeoDiffError;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validate, folding all findings into one [`GeoDiffError::Config`].
    fn check(&self) -> crate::error::Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(GeoDiffError::config(joined))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            errors.push(ConfigError {
                field: "matching.epsilon".to_string(),
                message: format!("Epsilon must be a positive number, got {}", self.epsilon),
            });
        }

        if let Some(threshold) = self.threshold
            && (!threshold.is_finite() || threshold < 0.0)
        {
            errors.push(ConfigError {
                field: "matching.threshold".to_string(),
                message: format!("Threshold must be zero or positive, got {threshold}"),
            });
        }

        if self.parallel_threshold == 0 {
            errors.push(ConfigError {
                field: "matching.parallel_threshold".to_string(),
                message: "Parallel threshold must be at least 1".to_string(),
            });
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref dump) = self.dump_index
            && let Some(parent) = dump.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError {
                field: "output.dump_index".to_string(),
                message: format!("Parent directory does not exist: {}", parent.display()),
            });
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.verbose && self.quiet {
            return vec![ConfigError {
                field: "behavior".to_string(),
                message: "'verbose' and 'quiet' cannot both be set".to_string(),
            }];
        }
        Vec::new()
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.paths.before.exists() {
            errors.push(ConfigError {
                field: "paths.before".to_string(),
                message: format!("File not found: {}", self.paths.before.display()),
            });
        }
        if !self.paths.after.exists() {
            errors.push(ConfigError {
                field: "paths.after".to_string(),
                message: format!("File not found: {}", self.paths.after.display()),
            });
        }
        if self.paths.output_dir.is_file() {
            errors.push(ConfigError {
                field: "paths.output_dir".to_string(),
                message: format!("Not a directory: {}", self.paths.output_dir.display()),
            });
        }

        errors.extend(self.matching.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DiffPaths;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_matching_errors_name_fields() {
        let config = MatchingConfig {
            epsilon: 0.0,
            threshold: Some(f64::NAN),
            parallel_threshold: 0,
            ..MatchingConfig::default()
        };
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "matching.epsilon",
                "matching.threshold",
                "matching.parallel_threshold"
            ]
        );
    }

    #[test]
    fn test_zero_threshold_is_allowed() {
        let config = MatchingConfig {
            threshold: Some(0.0),
            ..MatchingConfig::default()
        };
        assert!(config.is_valid());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let behavior = BehaviorConfig {
            verbose: true,
            quiet: true,
        };
        let err = behavior.check().unwrap_err();
        assert!(matches!(err, GeoDiffError::Config(_)));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_missing_inputs_reported() {
        let config = DiffConfig::new(
            DiffPaths {
                before: PathBuf::from("/nonexistent/before.json"),
                after: PathBuf::from("/nonexistent/after.json"),
                output_dir: PathBuf::from("/nonexistent/out"),
            },
            AppConfig::default(),
        );
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "paths.before");
    }
}
