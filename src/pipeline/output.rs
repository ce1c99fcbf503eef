//! Output directory handling.

use crate::error::GeoDiffError;
use anyhow::{Context, Result};
use std::path::Path;

/// Make `dir` ready to receive result files.
///
/// A missing directory is created. A non-empty one is an
/// [`GeoDiffError::OutputExists`] error unless `force` is set, in which case
/// it is removed first. Removal is best effort: a failure is logged and the
/// following create reports any real problem.
pub fn prepare_output_dir(dir: &Path, force: bool) -> Result<()> {
    if dir.is_dir() && !is_empty_dir(dir)? {
        if !force {
            return Err(GeoDiffError::OutputExists(dir.to_path_buf()).into());
        }
        if let Err(e) = std::fs::remove_dir_all(dir) {
            tracing::warn!("Failed to clear output directory {}: {}", dir.display(), e);
        }
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory: {}", dir.display()))?;
    Ok(entries.next().is_none())
}
