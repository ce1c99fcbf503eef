//! Feature subsets of changed records.

use super::{FEATURES_FILE, ReportContext, ReportWriter, write_dataset};
use crate::error::{GeoDiffError, Result};
use crate::model::Dataset;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DELETED_FEATURES_DIR: &str = "deleteds_features";
pub const UPDATED_FEATURES_DIR: &str = "updateds_features";
pub const INSERTED_FEATURES_DIR: &str = "inserteds_features";

/// Writes deleted features (from the before set) and updated and inserted
/// features (from the after set), each as its own dataset directory.
///
/// Empty subsets produce no directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureSetWriter;

impl FeatureSetWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_subset(dir: &Path, name: &str, subset: &Dataset) -> Result<Option<PathBuf>> {
        if subset.is_empty() {
            return Ok(None);
        }
        let subdir = dir.join(name);
        std::fs::create_dir_all(&subdir).map_err(|e| GeoDiffError::io(&subdir, e))?;
        let path = subdir.join(FEATURES_FILE);
        write_dataset(&path, subset)?;
        debug!(path = %path.display(), features = subset.len(), "Wrote feature subset");
        Ok(Some(path))
    }
}

impl ReportWriter for FeatureSetWriter {
    fn write(&self, ctx: &ReportContext<'_>, dir: &Path) -> Result<Vec<PathBuf>> {
        let subsets = [
            (DELETED_FEATURES_DIR, ctx.report.deleted_features(ctx.before)),
            (UPDATED_FEATURES_DIR, ctx.report.updated_features(ctx.after)),
            (INSERTED_FEATURES_DIR, ctx.report.inserted_features(ctx.after)),
        ];
        let mut written = Vec::new();
        for (name, subset) in &subsets {
            written.extend(Self::write_subset(dir, name, subset)?);
        }
        Ok(written)
    }

    fn name(&self) -> &'static str {
        "features"
    }
}
