//! Plain-text sequence number lists.

use super::{ReportContext, ReportWriter};
use crate::error::{GeoDiffError, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Deleted before seqnos, one per line
pub const DELETED_IDS_FILE: &str = "deleteds";
/// `before,after` seqno pairs of updated records, one per line
pub const UPDATED_IDS_FILE: &str = "updates";
/// Inserted after seqnos, one per line
pub const INSERTED_IDS_FILE: &str = "inserteds";

/// Writes the three id lists, skipping empty ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdListWriter;

impl IdListWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// One seqno per line.
    #[must_use]
    pub fn format_seqnos(seqnos: &[usize]) -> String {
        seqnos.iter().fold(String::new(), |mut out, s| {
            let _ = writeln!(out, "{s}");
            out
        })
    }

    /// One `before,after` pair per line.
    #[must_use]
    pub fn format_pairs(pairs: &[(usize, usize)]) -> String {
        pairs.iter().fold(String::new(), |mut out, (b, a)| {
            let _ = writeln!(out, "{b},{a}");
            out
        })
    }
}

impl ReportWriter for IdListWriter {
    fn write(&self, ctx: &ReportContext<'_>, dir: &Path) -> Result<Vec<PathBuf>> {
        let report = ctx.report;
        let lists = [
            (DELETED_IDS_FILE, Self::format_seqnos(&report.deleted_seqnos())),
            (UPDATED_IDS_FILE, Self::format_pairs(&report.update_pairs())),
            (INSERTED_IDS_FILE, Self::format_seqnos(&report.inserted_seqnos())),
        ];

        let mut written = Vec::new();
        for (name, content) in lists {
            if content.is_empty() {
                continue;
            }
            let path = dir.join(name);
            std::fs::write(&path, content).map_err(|e| GeoDiffError::io(&path, e))?;
            debug!(path = %path.display(), "Wrote id list");
            written.push(path);
        }
        Ok(written)
    }

    fn name(&self) -> &'static str {
        "id-lists"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        assert_eq!(IdListWriter::format_seqnos(&[5, 47]), "5\n47\n");
        assert_eq!(IdListWriter::format_pairs(&[(10, 98), (11, 99)]), "10,98\n11,99\n");
        assert_eq!(IdListWriter::format_seqnos(&[]), "");
    }
}
