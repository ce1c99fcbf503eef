//! Comparison result structures.

use crate::model::{ChangeStatus, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One Updated pair with the first attribute that differs.
///
/// `field` is `None` when the pair came from the multi-candidate fallback and
/// the attributes are in fact equal (the before record was already claimed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetail {
    pub before: usize,
    pub after: usize,
    pub field: Option<String>,
}

/// Final classification of both snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ChangeReport {
    before: Vec<ChangeStatus>,
    after: Vec<ChangeStatus>,
    /// Matched before seqno for every after seqno
    matched: Vec<Option<usize>>,
    updates: Vec<UpdateDetail>,
}

impl ChangeReport {
    pub(crate) fn new(
        before: Vec<ChangeStatus>,
        after: Vec<ChangeStatus>,
        matched: Vec<Option<usize>>,
        updates: Vec<UpdateDetail>,
    ) -> Self {
        Self {
            before,
            after,
            matched,
            updates,
        }
    }

    #[must_use]
    pub fn before_count(&self) -> usize {
        self.before.len()
    }

    #[must_use]
    pub fn after_count(&self) -> usize {
        self.after.len()
    }

    #[must_use]
    pub fn before_status(&self, seqno: usize) -> Option<ChangeStatus> {
        self.before.get(seqno).copied()
    }

    #[must_use]
    pub fn after_status(&self, seqno: usize) -> Option<ChangeStatus> {
        self.after.get(seqno).copied()
    }

    /// Before record an after record was paired with.
    #[must_use]
    pub fn matched_before(&self, after: usize) -> Option<usize> {
        self.matched.get(after).copied().flatten()
    }

    /// Diagnostics for every Updated pair, in after order.
    #[must_use]
    pub fn update_details(&self) -> &[UpdateDetail] {
        &self.updates
    }

    /// Before seqnos with the given status, ascending.
    #[must_use]
    pub fn before_seqnos(&self, status: ChangeStatus) -> Vec<usize> {
        seqnos_with(&self.before, status)
    }

    /// After seqnos with the given status, ascending.
    #[must_use]
    pub fn after_seqnos(&self, status: ChangeStatus) -> Vec<usize> {
        seqnos_with(&self.after, status)
    }

    #[must_use]
    pub fn deleted_seqnos(&self) -> Vec<usize> {
        self.before_seqnos(ChangeStatus::Deleted)
    }

    #[must_use]
    pub fn inserted_seqnos(&self) -> Vec<usize> {
        self.after_seqnos(ChangeStatus::Inserted)
    }

    /// `(before, after)` for every Updated after record, in after order.
    #[must_use]
    pub fn update_pairs(&self) -> Vec<(usize, usize)> {
        self.pairs_with(ChangeStatus::Updated)
    }

    /// `(before, after)` for every Unchanged after record, in after order.
    #[must_use]
    pub fn unchanged_pairs(&self) -> Vec<(usize, usize)> {
        self.pairs_with(ChangeStatus::Unchanged)
    }

    /// Every after record paired with each before record.
    ///
    /// Under the greedy fallback one before record can collect several.
    #[must_use]
    pub fn before_to_after(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (after, before) in self.matched.iter().enumerate() {
            if let Some(before) = before {
                map.entry(*before).or_default().push(after);
            }
        }
        map
    }

    fn pairs_with(&self, status: ChangeStatus) -> Vec<(usize, usize)> {
        self.after
            .iter()
            .zip(&self.matched)
            .enumerate()
            .filter(|(_, (s, _))| **s == status)
            .filter_map(|(after, (_, before))| before.map(|b| (b, after)))
            .collect()
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.before.iter().chain(&self.after).any(|s| !s.is_unchanged())
    }

    pub fn summary(&self) -> ChangeSummary {
        let count = |v: &[ChangeStatus], s: ChangeStatus| v.iter().filter(|x| **x == s).count();
        let (before, after) = (self.before.as_slice(), self.after.as_slice());
        ChangeSummary {
            before_count: before.len(),
            after_count: after.len(),
            unchanged: count(before, ChangeStatus::Unchanged),
            updated: count(after, ChangeStatus::Updated),
            deleted: count(before, ChangeStatus::Deleted),
            inserted: count(after, ChangeStatus::Inserted),
        }
    }

    // ========================================================================
    // Payload resolution
    // ========================================================================

    /// Deleted features, taken from the before dataset.
    pub fn deleted_features(&self, before: &Dataset) -> Dataset {
        before.subset(self.deleted_seqnos())
    }

    /// Updated features in their new form, taken from the after dataset.
    pub fn updated_features(&self, after: &Dataset) -> Dataset {
        after.subset(self.after_seqnos(ChangeStatus::Updated))
    }

    /// Inserted features, taken from the after dataset.
    pub fn inserted_features(&self, after: &Dataset) -> Dataset {
        after.subset(self.inserted_seqnos())
    }
}

fn seqnos_with(statuses: &[ChangeStatus], status: ChangeStatus) -> Vec<usize> {
    statuses
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == status)
        .map(|(i, _)| i)
        .collect()
}

/// Counts of one comparison run.
///
/// `unchanged` and `deleted` count before records; `updated` and `inserted`
/// count after records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub before_count: usize,
    pub after_count: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "before_count={}, after_count={}, unchanged={}, updated={}, inserted={}, deleted={}",
            self.before_count,
            self.after_count,
            self.unchanged,
            self.updated,
            self.inserted,
            self.deleted
        )
    }
}
