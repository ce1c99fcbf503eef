//! Spatial candidate search and scoring.
//!
//! This is the read-only half of classification: it touches only the index
//! and the immutable records, so it can run for many after records at once.

use super::MatchConfig;
use crate::index::SpatialIndex;
use crate::model::{Envelope, GeometryRecord};
use rayon::prelude::*;
use serde::Serialize;

/// A before record found near an after record, with its difference score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateMatch {
    pub before: usize,
    pub after: usize,
    pub score: f64,
}

impl std::fmt::Display for CandidateMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<->{}:{:.3}", self.before, self.after, self.score)
    }
}

/// Search window for an after record: its center grown by `epsilon`.
#[must_use]
pub fn search_envelope(record: &GeometryRecord, epsilon: f64) -> Envelope {
    Envelope::from_coord(record.center()).expanded_by(epsilon)
}

/// Eligible before records for one after record, best first.
///
/// Candidates scoring above the threshold are dropped; a score equal to the
/// threshold is kept. Equal scores are ordered by before seqno.
pub fn find_candidates<I>(
    index: &I,
    after: &GeometryRecord,
    config: &MatchConfig,
) -> Vec<CandidateMatch>
where
    I: SpatialIndex<GeometryRecord> + ?Sized,
{
    let window = search_envelope(after, config.epsilon);
    let mut found: Vec<CandidateMatch> = index
        .query(&window)
        .map(|before| CandidateMatch {
            before: before.seqno(),
            after: after.seqno(),
            score: config.measure.score(before.geometry(), after.geometry()),
        })
        .filter(|m| m.score <= config.threshold)
        .collect();
    found.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.before.cmp(&b.before)));
    found
}

/// Candidate lists for every after record, in after order.
///
/// Runs on the rayon pool when enabled and the after set reaches the
/// configured size; the result is the same either way.
pub fn collect_candidates<I>(
    index: &I,
    after: &[GeometryRecord],
    config: &MatchConfig,
) -> Vec<Vec<CandidateMatch>>
where
    I: SpatialIndex<GeometryRecord> + Sync + ?Sized,
{
    if config.parallel && after.len() >= config.parallel_threshold {
        after
            .par_iter()
            .map(|record| find_candidates(index, record, config))
            .collect()
    } else {
        after
            .iter()
            .map(|record| find_candidates(index, record, config))
            .collect()
    }
}
