//! Spatial match engine implementation.

use super::candidates::{CandidateMatch, collect_candidates};
use super::result::{ChangeReport, UpdateDetail};
use super::tracker::ChangeTracker;
use super::{FallbackPolicy, MatchConfig};
use crate::error::{ErrorContext, GeoDiffError, IndexErrorKind, Result};
use crate::index::{RecordIndex, SpatialIndex, record_index};
use crate::model::{ChangeStatus, Dataset, Envelope, GeometryRecord};
use geo_types::Coord;
use tracing::{debug, info, warn};

/// Engine classifying the records of two dataset snapshots.
///
/// ```ignore
/// use geodiff::diff::{MatchConfig, MatchEngine};
///
/// let engine = MatchEngine::new().with_config(MatchConfig::polygons());
/// let report = engine.compare(&before, &after)?;
/// println!("{}", report.summary());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    /// Create an engine with default settings (line datasets, greedy fallback)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tie-breaking policy for ambiguous matches
    #[must_use]
    pub const fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.config.fallback = fallback;
        self
    }

    /// Enable or disable parallel candidate search
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Index records by their centers.
    ///
    /// The root covers the union of the records' envelopes. Fails if a
    /// record cannot be placed.
    pub fn build_index(&self, records: &[GeometryRecord]) -> Result<RecordIndex> {
        let bounds = Envelope::union_all(records.iter().map(GeometryRecord::envelope))
            .unwrap_or_else(|| Envelope::from_coord(Coord { x: 0.0, y: 0.0 }));
        let mut index = record_index(bounds);
        for record in records {
            if !index.insert(record.clone()) {
                return Err(GeoDiffError::index(
                    format!("building index over {bounds}"),
                    IndexErrorKind::InsertRejected {
                        seqno: record.seqno(),
                    },
                ));
            }
        }
        debug!(
            records = index.len(),
            leaves = index.partitions().len(),
            depth = index.depth(),
            "Built spatial index"
        );
        Ok(index)
    }

    /// Compare two snapshots and classify every record of both.
    pub fn compare(&self, before: &Dataset, after: &Dataset) -> Result<ChangeReport> {
        self.config.validate()?;
        let before_records = before.records().context("before dataset")?;
        let after_records = after.records().context("after dataset")?;

        let index = self.build_index(&before_records)?;
        info!(
            before = before_records.len(),
            after = after_records.len(),
            measure = %self.config.measure,
            epsilon = self.config.epsilon,
            threshold = self.config.threshold,
            "Comparing datasets"
        );
        Ok(self.classify(&index, before, after, &after_records))
    }

    /// Classify after records against an already built index of `before`.
    ///
    /// Candidate search may run in parallel; status resolution always runs
    /// in after-record order.
    pub fn classify<I>(
        &self,
        index: &I,
        before: &Dataset,
        after: &Dataset,
        after_records: &[GeometryRecord],
    ) -> ChangeReport
    where
        I: SpatialIndex<GeometryRecord> + Sync + ?Sized,
    {
        if before.schema != after.schema {
            warn!(
                before = before.schema.len(),
                after = after.schema.len(),
                "Schemas differ; attributes are compared by the before dataset's field names"
            );
        }

        let candidates = collect_candidates(index, after_records, &self.config);

        let mut resolver = Resolver {
            before,
            after,
            fallback: self.config.fallback,
            tracker: ChangeTracker::new(before.len(), after.len()),
            updates: Vec::new(),
        };
        for (seqno, found) in candidates.into_iter().enumerate() {
            resolver.resolve(seqno, found);
        }
        resolver.tracker.into_report(resolver.updates)
    }
}

/// Sequential status assignment over precomputed candidate lists.
struct Resolver<'a> {
    before: &'a Dataset,
    after: &'a Dataset,
    fallback: FallbackPolicy,
    tracker: ChangeTracker,
    updates: Vec<UpdateDetail>,
}

impl Resolver<'_> {
    fn resolve(&mut self, after: usize, mut found: Vec<CandidateMatch>) {
        if self.fallback == FallbackPolicy::ExcludeClaimed {
            found.retain(|m| !self.tracker.is_claimed(m.before));
        }

        match found.as_slice() {
            [] => self.tracker.mark_inserted(after),
            [only] => {
                let before = only.before;
                match self.first_difference(before, after) {
                    None => self.tracker.mark_pair(before, after, ChangeStatus::Unchanged),
                    Some(field) => {
                        info!("found difference: {before} <-> {after}, diff_col={field}");
                        self.mark_updated(before, after, Some(field));
                    }
                }
            }
            [best, ..] => {
                debug!(
                    after,
                    candidates = %found.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                    "multiple geometry matches"
                );
                let unclaimed_equal = found.iter().find(|m| {
                    !self.tracker.is_claimed(m.before)
                        && self.first_difference(m.before, after).is_none()
                });
                if let Some(m) = unclaimed_equal {
                    self.tracker
                        .mark_pair(m.before, after, ChangeStatus::Unchanged);
                } else {
                    let before = best.before;
                    info!("multiple geometry matches => updated: {before} = {after}");
                    let field = self.first_difference(before, after);
                    self.mark_updated(before, after, field);
                }
            }
        }
    }

    fn mark_updated(&mut self, before: usize, after: usize, field: Option<String>) {
        self.tracker.mark_pair(before, after, ChangeStatus::Updated);
        self.updates.push(UpdateDetail {
            before,
            after,
            field,
        });
    }

    fn first_difference(&self, before: usize, after: usize) -> Option<String> {
        let (Some(b), Some(a)) = (self.before.feature(before), self.after.feature(after)) else {
            return None;
        };
        self.before
            .schema
            .first_difference(b, a)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryType, parse_wkt};
    use crate::model::{AttributeValue, Feature, FieldDef, FieldType, Schema};

    fn dataset(rows: &[(&str, i64, &str)]) -> Dataset {
        let mut ds = Dataset::new(
            "test",
            GeometryType::LineString,
            Schema::new(vec![
                FieldDef::new("id", FieldType::Int),
                FieldDef::new("name", FieldType::Text),
            ]),
        );
        for (wkt, id, name) in rows {
            ds.push(Feature::new(
                parse_wkt(wkt).expect("valid WKT"),
                [
                    ("id".to_string(), AttributeValue::Int(*id)),
                    ("name".to_string(), AttributeValue::Text((*name).to_string())),
                ]
                .into_iter()
                .collect(),
            ));
        }
        ds
    }

    #[test]
    fn test_single_candidate_equal_is_unchanged() {
        let before = dataset(&[("LINESTRING(0 0,10 0)", 1, "a")]);
        let report = MatchEngine::new()
            .compare(&before, &before.clone())
            .expect("comparison succeeds");
        assert_eq!(report.unchanged_pairs(), vec![(0, 0)]);
        assert!(!report.has_changes());
    }

    #[test]
    fn test_attribute_change_records_field() {
        let before = dataset(&[("LINESTRING(0 0,10 0)", 1, "a")]);
        let after = dataset(&[("LINESTRING(0 0,10 0)", 1, "b")]);
        let report = MatchEngine::new()
            .compare(&before, &after)
            .expect("comparison succeeds");
        assert_eq!(report.update_pairs(), vec![(0, 0)]);
        assert_eq!(report.update_details()[0].field.as_deref(), Some("name"));
    }

    #[test]
    fn test_multiple_candidates_prefer_unclaimed_equal() {
        let before = dataset(&[
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 2, "b"),
        ]);
        let after = dataset(&[
            ("LINESTRING(0 0,10 0)", 2, "b"),
            ("LINESTRING(0 0,10 0)", 1, "a"),
        ]);
        let report = MatchEngine::new()
            .compare(&before, &after)
            .expect("comparison succeeds");
        assert_eq!(report.unchanged_pairs(), vec![(1, 0), (0, 1)]);
        assert!(report.deleted_seqnos().is_empty());
    }

    #[test]
    fn test_greedy_fallback_reuses_claimed_candidate() {
        let before = dataset(&[
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 2, "b"),
        ]);
        let after = dataset(&[
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 1, "a"),
        ]);
        let report = MatchEngine::new()
            .compare(&before, &after)
            .expect("comparison succeeds");
        // Second copy finds 0 claimed and 1 different: falls back to 0
        assert_eq!(report.unchanged_pairs(), vec![(0, 0)]);
        assert_eq!(report.update_pairs(), vec![(0, 1)]);
        assert_eq!(report.update_details()[0].field, None);
        assert_eq!(report.deleted_seqnos(), vec![1]);
    }

    #[test]
    fn test_exclude_claimed_keeps_pairing_one_to_one() {
        let before = dataset(&[
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 2, "b"),
        ]);
        let after = dataset(&[
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 1, "a"),
            ("LINESTRING(0 0,10 0)", 1, "a"),
        ]);
        let report = MatchEngine::new()
            .with_fallback(FallbackPolicy::ExcludeClaimed)
            .compare(&before, &after)
            .expect("comparison succeeds");
        assert_eq!(report.unchanged_pairs(), vec![(0, 0)]);
        assert_eq!(report.update_pairs(), vec![(1, 1)]);
        assert_eq!(report.inserted_seqnos(), vec![2]);
        assert!(report.before_to_after().values().all(|v| v.len() == 1));
    }

    #[test]
    fn test_empty_before_marks_everything_inserted() {
        let before = dataset(&[]);
        let after = dataset(&[("LINESTRING(0 0,10 0)", 1, "a")]);
        let report = MatchEngine::new()
            .compare(&before, &after)
            .expect("comparison succeeds");
        assert_eq!(report.inserted_seqnos(), vec![0]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = MatchConfig::default();
        config.epsilon = -1.0;
        let ds = dataset(&[]);
        let err = MatchEngine::new()
            .with_config(config)
            .compare(&ds, &ds)
            .unwrap_err();
        assert!(matches!(err, GeoDiffError::Validation(_)));
    }
}
