//! Report output stage.

use crate::config::DiffConfig;
use crate::diff::ChangeReport;
use crate::model::Dataset;
use crate::reports::{ReportContext, create_writers};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Write every configured output into the run's output directory.
///
/// The directory must already be prepared.
pub fn output_report(
    config: &DiffConfig,
    report: &ChangeReport,
    before: &Dataset,
    after: &Dataset,
) -> Result<Vec<PathBuf>> {
    let ctx = ReportContext {
        report,
        before,
        after,
    };
    let dir = &config.paths.output_dir;

    let mut written = Vec::new();
    for writer in create_writers(&config.output) {
        let paths = writer
            .write(&ctx, dir)
            .with_context(|| format!("Failed to write {} output", writer.name()))?;
        written.extend(paths);
    }

    if !config.behavior.quiet {
        tracing::info!("Wrote {} files to {}", written.len(), dir.display());
    }
    Ok(written)
}
