//! Named presets for geodiff.

use super::types::{AppConfig, MatchingConfig};
use crate::geometry::{DifferenceMeasure, GeometryType};

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets, one per kind of dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Line datasets: symmetric-difference length, threshold 0.1
    Lines,
    /// Polygon datasets: symmetric-difference area, threshold 1.0
    Polygons,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Polygons => "polygons",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "lines" | "line" | "length" => Some(Self::Lines),
            "polygons" | "polygon" | "area" => Some(Self::Polygons),
            _ => None,
        }
    }

    /// Preset suited to a dataset's geometry type.
    #[must_use]
    pub const fn for_geometry_type(geometry_type: GeometryType) -> Self {
        if geometry_type.is_areal() {
            Self::Polygons
        } else {
            Self::Lines
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Lines, Self::Polygons]
    }

    /// Difference measure the preset scores with.
    #[must_use]
    pub const fn measure(self) -> DifferenceMeasure {
        match self {
            Self::Lines => DifferenceMeasure::Length,
            Self::Polygons => DifferenceMeasure::Area,
        }
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let measure = preset.measure();
        Self {
            matching: MatchingConfig {
                measure,
                threshold: Some(measure.default_threshold()),
                ..MatchingConfig::default()
            },
            ..Self::default()
        }
    }
}
