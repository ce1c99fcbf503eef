//! Single-owner status bookkeeping for one comparison run.

use super::result::{ChangeReport, UpdateDetail};
use crate::model::ChangeStatus;

/// Status of every before and after record, indexed by seqno.
///
/// Before records start [`ChangeStatus::Deleted`]; after records start
/// pending. Only the resolution phase holds this, so every transition has
/// exactly one writer.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    before: Vec<ChangeStatus>,
    after: Vec<Option<ChangeStatus>>,
    matched: Vec<Option<usize>>,
}

impl ChangeTracker {
    #[must_use]
    pub fn new(before_count: usize, after_count: usize) -> Self {
        Self {
            before: vec![ChangeStatus::Deleted; before_count],
            after: vec![None; after_count],
            matched: vec![None; after_count],
        }
    }

    #[must_use]
    pub fn before_status(&self, seqno: usize) -> ChangeStatus {
        self.before[seqno]
    }

    /// Status of an after record, `None` while pending.
    #[must_use]
    pub fn after_status(&self, seqno: usize) -> Option<ChangeStatus> {
        self.after[seqno]
    }

    /// Whether an earlier pairing already consumed this before record.
    #[must_use]
    pub fn is_claimed(&self, before: usize) -> bool {
        !self.before[before].is_deleted()
    }

    pub fn mark_inserted(&mut self, after: usize) {
        self.after[after] = Some(ChangeStatus::Inserted);
        self.matched[after] = None;
    }

    /// Pair two records under the same status (Unchanged or Updated).
    pub fn mark_pair(&mut self, before: usize, after: usize, status: ChangeStatus) {
        debug_assert!(status.is_unchanged() || status.is_updated());
        self.before[before] = status;
        self.after[after] = Some(status);
        self.matched[after] = Some(before);
    }

    /// Finish the run. Any after record never resolved counts as inserted.
    #[must_use]
    pub fn into_report(self, updates: Vec<UpdateDetail>) -> ChangeReport {
        let after = self
            .after
            .into_iter()
            .map(|s| s.unwrap_or(ChangeStatus::Inserted))
            .collect();
        ChangeReport::new(self.before, after, self.matched, updates)
    }
}
