//! Dataset loading stage.

use crate::config::ConfigPreset;
use crate::geometry::DifferenceMeasure;
use crate::model::Dataset;
use crate::parsers::load_dataset;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a dataset with context for error messages
pub fn load_dataset_with_context(path: &Path, quiet: bool) -> Result<Dataset> {
    if !quiet {
        tracing::info!("Loading dataset: {}", path.display());
    }

    let dataset = load_dataset(path)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;

    if !quiet {
        tracing::info!(
            "Loaded {} {} features from '{}'",
            dataset.len(),
            dataset.geometry_type,
            dataset.name
        );
    }
    Ok(dataset)
}

/// Load the before and after datasets.
pub fn load_datasets(before: &Path, after: &Path, quiet: bool) -> Result<(Dataset, Dataset)> {
    let before = load_dataset_with_context(before, quiet)?;
    let after = load_dataset_with_context(after, quiet)?;
    if before.geometry_type != after.geometry_type {
        tracing::warn!(
            "Geometry types differ: before is {}, after is {}",
            before.geometry_type,
            after.geometry_type
        );
    }
    Ok((before, after))
}

/// Warn when the measure does not suit the before dataset's geometry type.
///
/// The measure stays a caller choice. Returns whether a warning was logged.
pub fn check_measure(before: &Dataset, measure: DifferenceMeasure) -> bool {
    let suggested = ConfigPreset::for_geometry_type(before.geometry_type);
    let mismatch = suggested.measure() != measure;
    if mismatch {
        tracing::warn!(
            "{} datasets usually use the {} preset (--measure {}), comparing by {}",
            before.geometry_type,
            suggested,
            suggested.measure(),
            measure
        );
    }
    mismatch
}
