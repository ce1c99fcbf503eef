//! Human-readable run summary.

use crate::diff::ChangeSummary;
use std::fmt::Write as _;
use std::path::Path;

/// Renders the end-of-run summary printed with `--verbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryReporter;

impl SummaryReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn render(&self, summary: &ChangeSummary, before: &Path, after: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "before: {}", before.display());
        let _ = writeln!(out, "after:  {}", after.display());
        let _ = writeln!(out, "{summary}");
        out
    }
}
