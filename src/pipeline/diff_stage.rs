//! Comparison stage.
//!
//! Builds the engine from the run configuration, indexes the before set,
//! optionally dumps the index, and classifies the after set.

use crate::config::DiffConfig;
use crate::diff::{ChangeReport, MatchEngine};
use crate::model::Dataset;
use crate::reports::write_index_dump;
use anyhow::{Context, Result};

/// Run the comparison between two datasets.
pub fn compute_diff(config: &DiffConfig, before: &Dataset, after: &Dataset) -> Result<ChangeReport> {
    let quiet = config.behavior.quiet;
    let engine = MatchEngine::new().with_config(config.matching.to_match_config());
    engine
        .config()
        .validate()
        .context("Invalid matching configuration")?;

    if !quiet {
        tracing::info!("Computing spatial diff...");
    }

    let before_records = before.records().context("Invalid before dataset")?;
    let after_records = after.records().context("Invalid after dataset")?;
    let index = engine
        .build_index(&before_records)
        .context("Failed to index before dataset")?;

    if let Some(ref path) = config.output.dump_index {
        write_index_dump(path, &index)
            .with_context(|| format!("Failed to dump index to {}", path.display()))?;
        if !quiet {
            tracing::info!("Index written to {}", path.display());
        }
    }

    let report = engine.classify(&index, before, after, &after_records);

    if !quiet {
        let summary = report.summary();
        tracing::info!(
            "Changes: {} updated, {} deleted, {} inserted",
            summary.updated,
            summary.deleted,
            summary.inserted
        );
    }
    Ok(report)
}
