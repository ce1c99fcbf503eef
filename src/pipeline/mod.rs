//! Pipeline orchestration for a comparison run.
//!
//! load → prepare output → diff → write outputs. Each stage returns
//! `anyhow::Result` with context naming the stage's inputs.

mod diff_stage;
mod output;
mod parse;
mod report_stage;

pub use diff_stage::compute_diff;
pub use output::prepare_output_dir;
pub use parse::{check_measure, load_dataset_with_context, load_datasets};
pub use report_stage::output_report;

use crate::config::DiffConfig;
use crate::diff::ChangeReport;
use anyhow::Result;

/// Exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Run every stage for one configuration.
pub fn run(config: &DiffConfig) -> Result<ChangeReport> {
    let quiet = config.behavior.quiet;
    let (before, after) = load_datasets(&config.paths.before, &config.paths.after, quiet)?;
    check_measure(&before, config.matching.measure);
    prepare_output_dir(&config.paths.output_dir, config.output.force)?;
    let report = compute_diff(config, &before, &after)?;
    output_report(config, &report, &before, &after)?;
    Ok(report)
}
