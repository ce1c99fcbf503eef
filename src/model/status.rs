//! Per-record change classification.

use serde::{Deserialize, Serialize};

/// Classification of a record after comparing two snapshots.
///
/// Before records start [`Deleted`](Self::Deleted) and after records start
/// unclassified; matching moves them to [`Unchanged`](Self::Unchanged) or
/// [`Updated`](Self::Updated), and unmatched after records end up
/// [`Inserted`](Self::Inserted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Unchanged,
    Updated,
    Deleted,
    Inserted,
}

impl ChangeStatus {
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
            Self::Inserted => write!(f, "inserted"),
        }
    }
}
