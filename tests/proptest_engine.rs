//! Property-based tests for the match engine.
//!
//! Random point and line datasets, checked for identity and for the
//! partitioning of both sides into matched and unmatched records.

use geodiff::diff::{FallbackPolicy, MatchConfig, MatchEngine};
use geodiff::geometry::GeometryType;
use geodiff::model::{AttributeValue, Dataset, Feature, FieldDef, FieldType, Schema};
use geo_types::{Geometry, LineString, Point};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn schema() -> Schema {
    Schema::new(vec![FieldDef::new("tag", FieldType::Int)])
}

fn dataset(rows: &[(i32, i32, bool, i64)]) -> Dataset {
    let mut ds = Dataset::new("random", GeometryType::GeometryCollection, schema());
    for &(x, y, is_line, tag) in rows {
        let (x, y) = (f64::from(x), f64::from(y));
        let geometry = if is_line {
            Geometry::LineString(LineString::from(vec![(x, y), (x + 1.0, y + 0.5)]))
        } else {
            Geometry::Point(Point::new(x, y))
        };
        ds.push(Feature::new(
            geometry,
            [("tag".to_string(), AttributeValue::Int(tag))].into_iter().collect(),
        ));
    }
    ds
}

fn rows(max: usize) -> impl Strategy<Value = Vec<(i32, i32, bool, i64)>> {
    prop::collection::vec((0..20i32, 0..20i32, any::<bool>(), 0..3i64), 0..max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn comparing_a_dataset_with_itself_changes_nothing(rows in rows(60)) {
        // Distinct keys so every record has exactly one equal twin
        let unique: Vec<_> = rows
            .into_iter()
            .map(|(x, y, l, t)| ((x, y, l), t))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_iter()
            .map(|((x, y, l), t)| (x, y, l, t))
            .collect();
        let ds = dataset(&unique);

        let report = MatchEngine::new().compare(&ds, &ds).expect("comparison succeeds");

        prop_assert!(!report.has_changes());
        prop_assert_eq!(report.summary().unchanged, ds.len());
    }

    #[test]
    fn both_sides_are_partitioned(
        before in rows(40),
        after in rows(40),
        exclusive in any::<bool>(),
    ) {
        let before = dataset(&before);
        let after = dataset(&after);
        let fallback = if exclusive { FallbackPolicy::ExcludeClaimed } else { FallbackPolicy::Greedy };

        let report = MatchEngine::new()
            .with_config(MatchConfig::lines())
            .with_fallback(fallback)
            .compare(&before, &after)
            .expect("comparison succeeds");

        let deleted: BTreeSet<usize> = report.deleted_seqnos().into_iter().collect();
        let pairs = report.before_to_after();
        prop_assert!(pairs.keys().all(|b| !deleted.contains(b)));
        prop_assert_eq!(deleted.len() + pairs.len(), before.len());

        let inserted: BTreeSet<usize> = report.inserted_seqnos().into_iter().collect();
        for a in 0..after.len() {
            prop_assert!(inserted.contains(&a) != report.matched_before(a).is_some());
        }

        if exclusive {
            prop_assert!(pairs.values().all(|afters| afters.len() == 1));
        }
    }
}
