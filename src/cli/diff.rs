//! Diff command handler.
//!
//! Compares two dataset snapshots and writes the change lists.

use crate::config::{DiffConfig, Validatable};
use crate::pipeline::{self, exit_codes};
use crate::reports::SummaryReporter;
use anyhow::{Context, Result};

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    config.check().context("Invalid arguments")?;

    let report = pipeline::run(&config)?;

    if config.behavior.verbose {
        let text = SummaryReporter::new().render(
            &report.summary(),
            &config.paths.before,
            &config.paths.after,
        );
        print!("{text}");
    }

    Ok(exit_codes::SUCCESS)
}
