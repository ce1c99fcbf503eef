//! Bounded-capacity leaf storage with coordinate-collision grouping.
//!
//! A partition holds at most [`PARTITION_CAPACITY`] slots and refuses any
//! insert once they are all taken. Normally each slot is one value, but
//! datasets often contain many records sharing the exact same center
//! (duplicated features, stacked points). Splitting space never separates
//! those, so the index may replace a full partition with a rebuilt one in
//! which every set of coincident values is collapsed into one [`Slot::Group`].
//!
//! Grouping is decided when the partition is built or rebuilt, never on an
//! ordinary append. A later value landing on a group's point may join that
//! group (`prefer_fast_path = false`) but no new group is ever formed until
//! the next rebuild.

use super::{PointPartition, PointValue};
use crate::error::{ErrorContext, GeoDiffError, IndexErrorKind, Result};
use crate::geometry::{parse_wkt, to_wkt};
use crate::model::{Envelope, GeometryRecord};
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Slot capacity of a leaf partition.
pub const PARTITION_CAPACITY: usize = 64;

/// One slot of a partition.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<V> {
    Single(V),
    /// Values sharing an identical point; never empty.
    Group(Vec<V>),
}

impl<V: PointValue> Slot<V> {
    fn point(&self) -> Coord<f64> {
        match self {
            Self::Single(v) => v.point(),
            Self::Group(vs) => vs[0].point(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Group(vs) => vs.len(),
        }
    }

    fn iter(&self) -> std::slice::Iter<'_, V> {
        match self {
            Self::Single(v) => std::slice::from_ref(v).iter(),
            Self::Group(vs) => vs.iter(),
        }
    }

    fn push(&mut self, value: V) {
        *self = match std::mem::replace(self, Self::Group(Vec::new())) {
            Self::Single(first) => Self::Group(vec![first, value]),
            Self::Group(mut members) => {
                members.push(value);
                Self::Group(members)
            }
        };
    }
}

/// Leaf storage for a [`PointQuadTree`](super::PointQuadTree).
#[derive(Debug, Clone)]
pub struct LeafPartition<V> {
    slots: Vec<Slot<V>>,
    bounds: Option<Envelope>,
    count: usize,
    capacity: usize,
    grouped: bool,
}

impl<V> Default for LeafPartition<V> {
    fn default() -> Self {
        Self::with_capacity(PARTITION_CAPACITY)
    }
}

impl<V> LeafPartition<V> {
    /// Empty partition with the standard capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty partition holding at most `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(PARTITION_CAPACITY)),
            bounds: None,
            count: 0,
            capacity,
            grouped: false,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether any slot holds a group of coincident values.
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.grouped
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Number of stored values; a group counts each member.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.count
    }

    /// Union of the stored values' envelopes.
    ///
    /// An empty partition reports a degenerate envelope at the origin.
    #[must_use]
    pub fn bounds(&self) -> Envelope {
        self.bounds
            .unwrap_or_else(|| Envelope::from_coord(Coord { x: 0.0, y: 0.0 }))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<V: PointValue + Clone> LeafPartition<V> {
    /// Iterate all stored values, flattening groups.
    ///
    /// Values come out in insertion order while the partition is ungrouped.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.slots.iter().flat_map(Slot::iter)
    }

    /// Store a value. See [`PointPartition::insert`].
    ///
    /// A partition with no free slot refuses the value and is left
    /// untouched, whatever `prefer_fast_path` says.
    pub fn insert(&mut self, value: &V, prefer_fast_path: bool) -> bool {
        if self.slots.len() >= self.capacity {
            return false;
        }
        if !prefer_fast_path {
            let point = value.point();
            if let Some(group) = self
                .slots
                .iter_mut()
                .find(|s| matches!(s, Slot::Group(_)) && s.point() == point)
            {
                group.push(value.clone());
                self.count += 1;
                self.expand(value.envelope());
                return true;
            }
        }
        self.push_slot(Slot::Single(value.clone()));
        true
    }

    /// A new partition holding this one's values plus `incoming`, built
    /// with [`from_records`](Self::from_records). `self` is not modified.
    #[must_use]
    pub fn rebuild(&self, incoming: &V, capacity: usize) -> Option<Self> {
        let mut values: Vec<V> = Vec::with_capacity(self.count + 1);
        values.extend(self.values().cloned());
        values.push(incoming.clone());
        Self::from_records(values, capacity)
    }

    /// Build a partition holding `values`, grouping coincident values when
    /// they would not fit one per slot.
    ///
    /// Returns `None` when the values need more than `capacity` slots even
    /// after grouping.
    #[must_use]
    pub fn from_records(values: Vec<V>, capacity: usize) -> Option<Self> {
        let mut partition = Self::with_capacity(capacity);
        for value in values {
            partition.push_slot(Slot::Single(value));
        }
        if partition.slots.len() > capacity {
            partition.compact();
        }
        (partition.slots.len() <= capacity).then_some(partition)
    }

    /// Rebuild the slots so that values sharing a point share one slot.
    ///
    /// Order of first appearance is kept. A partition without coincident
    /// values is left as it is.
    pub fn compact(&mut self) {
        let mut rebuilt: Vec<Slot<V>> = Vec::with_capacity(self.slots.len());
        for slot in std::mem::take(&mut self.slots) {
            let point = slot.point();
            match rebuilt.iter_mut().find(|s| s.point() == point) {
                Some(existing) => match slot {
                    Slot::Single(v) => existing.push(v),
                    Slot::Group(members) => {
                        for v in members {
                            existing.push(v);
                        }
                    }
                },
                None => rebuilt.push(slot),
            }
        }
        self.grouped = rebuilt.iter().any(|s| matches!(s, Slot::Group(_)));
        self.slots = rebuilt;
    }

    fn push_slot(&mut self, slot: Slot<V>) {
        for v in slot.iter() {
            self.expand(v.envelope());
        }
        self.count += slot.len();
        if matches!(slot, Slot::Group(_)) {
            self.grouped = true;
        }
        self.slots.push(slot);
    }

    fn expand(&mut self, envelope: Envelope) {
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(&envelope),
            None => envelope,
        });
    }
}

impl<V: PointValue + Clone> PointPartition<V> for LeafPartition<V> {
    fn insert(&mut self, value: &V, prefer_fast_path: bool) -> bool {
        Self::insert(self, value, prefer_fast_path)
    }

    fn size(&self) -> usize {
        self.count
    }

    fn values(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(Self::values(self))
    }

    fn bounds(&self) -> Envelope {
        Self::bounds(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn rebuild(&self, incoming: &V, capacity: usize) -> Option<Self> {
        Self::rebuild(self, incoming, capacity)
    }

    fn into_values(self) -> Vec<V> {
        let mut out = Vec::with_capacity(self.count);
        for slot in self.slots {
            match slot {
                Slot::Single(v) => out.push(v),
                Slot::Group(vs) => out.extend(vs),
            }
        }
        out
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialized form of one record: WKT geometry plus sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub geometry: String,
    pub seqno: usize,
}

impl RecordSnapshot {
    fn of(record: &GeometryRecord) -> Self {
        Self {
            geometry: to_wkt(record.geometry()),
            seqno: record.seqno(),
        }
    }

    fn restore(&self) -> Result<GeometryRecord> {
        let geometry = parse_wkt(&self.geometry)
            .with_context(|| format!("snapshot record {}", self.seqno))?;
        GeometryRecord::new(Arc::new(geometry), self.seqno)
    }
}

/// Serialized form of a partition.
///
/// Ungrouped values are listed in `singles`; each coincident set is one entry
/// of `groups`. A partition reads back as grouped exactly when `groups` is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    pub bounds: Envelope,
    pub count: usize,
    pub singles: Vec<RecordSnapshot>,
    #[serde(default)]
    pub groups: Vec<Vec<RecordSnapshot>>,
}

impl LeafPartition<GeometryRecord> {
    #[must_use]
    pub fn snapshot(&self) -> PartitionSnapshot {
        let mut singles = Vec::new();
        let mut groups = Vec::new();
        for slot in &self.slots {
            match slot {
                Slot::Single(r) => singles.push(RecordSnapshot::of(r)),
                Slot::Group(rs) => groups.push(rs.iter().map(RecordSnapshot::of).collect()),
            }
        }
        PartitionSnapshot {
            bounds: self.bounds(),
            count: self.count,
            singles,
            groups,
        }
    }

    /// Rebuild a partition from its snapshot, re-deriving every record's
    /// envelope and center from its geometry.
    pub fn from_snapshot(snapshot: &PartitionSnapshot) -> Result<Self> {
        let corrupt = |msg: String| {
            GeoDiffError::index("reading partition", IndexErrorKind::CorruptSnapshot(msg))
        };

        let slot_count = snapshot.singles.len() + snapshot.groups.len();
        if slot_count > PARTITION_CAPACITY {
            return Err(corrupt(format!(
                "{slot_count} slots exceed capacity {PARTITION_CAPACITY}"
            )));
        }

        let mut partition = Self::new();
        for single in &snapshot.singles {
            partition.push_slot(Slot::Single(single.restore()?));
        }
        for group in &snapshot.groups {
            let records = group
                .iter()
                .map(RecordSnapshot::restore)
                .collect::<Result<Vec<_>>>()?;
            let Some(first) = records.first() else {
                return Err(corrupt("empty group".to_string()));
            };
            let point = first.center();
            if records.iter().any(|r| r.center() != point) {
                return Err(corrupt(format!(
                    "group members do not share center ({}, {})",
                    point.x, point.y
                )));
            }
            partition.push_slot(Slot::Group(records));
        }

        if partition.count != snapshot.count {
            return Err(corrupt(format!(
                "count {} does not match {} stored records",
                snapshot.count, partition.count
            )));
        }
        partition.grouped = !snapshot.groups.is_empty();
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::parse_wkt;

    fn record(wkt: &str, seqno: usize) -> GeometryRecord {
        GeometryRecord::new(Arc::new(parse_wkt(wkt).expect("valid WKT")), seqno)
            .expect("non-empty geometry")
    }

    fn point(x: f64, y: f64, seqno: usize) -> GeometryRecord {
        record(&format!("POINT({x} {y})"), seqno)
    }

    fn full_partition() -> LeafPartition<GeometryRecord> {
        let mut p = LeafPartition::new();
        for i in 0..PARTITION_CAPACITY {
            assert!(p.insert(&point(i as f64, 0.0, i), true));
        }
        p
    }

    #[test]
    fn test_empty_partition_bounds_at_origin() {
        let p: LeafPartition<GeometryRecord> = LeafPartition::new();
        assert_eq!(p.size(), 0);
        assert_eq!(p.bounds(), Envelope::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(p.capacity(), PARTITION_CAPACITY);
    }

    #[test]
    fn test_bounds_cover_record_envelopes() {
        let mut p = LeafPartition::new();
        assert!(p.insert(&record("LINESTRING(0 0,2 2)", 0), true));
        assert!(p.insert(&record("LINESTRING(5 -1,6 1)", 1), true));
        assert_eq!(p.bounds(), Envelope::new(0.0, -1.0, 6.0, 2.0));
    }

    #[test]
    fn test_overflow_on_fast_path() {
        let mut p = full_partition();
        assert_eq!(p.size(), 64);
        let before = p.bounds();
        assert!(!p.insert(&point(100.0, 100.0, 64), true));
        assert_eq!(p.size(), 64);
        assert_eq!(p.slot_count(), 64);
        assert_eq!(p.bounds(), before);
    }

    #[test]
    fn test_full_partition_without_collision_rejects() {
        let mut p = full_partition();
        assert!(!p.insert(&point(100.0, 100.0, 64), false));
        assert_eq!(p.size(), 64);
        assert!(!p.is_grouped());
    }

    #[test]
    fn test_full_partition_refuses_collision_untouched() {
        let mut p = full_partition();
        let bounds = p.bounds();
        assert!(!p.insert(&point(3.0, 0.0, 64), false));
        assert!(!p.insert(&point(3.0, 0.0, 64), true));
        assert_eq!(p.size(), PARTITION_CAPACITY);
        assert_eq!(p.slot_count(), PARTITION_CAPACITY);
        assert_eq!(p.bounds(), bounds);
        assert!(!p.is_grouped());
    }

    #[test]
    fn test_full_grouped_partition_refuses_group_member() {
        let stacked: Vec<GeometryRecord> = (0..4).map(|i| point(1.0, 1.0, i)).collect();
        let mut p = LeafPartition::from_records(stacked, 1).expect("fits once grouped");
        assert_eq!(p.slot_count(), 1);
        assert!(!p.insert(&point(1.0, 1.0, 4), false));
        assert_eq!(p.size(), 4);
    }

    #[test]
    fn test_rebuild_groups_and_leaves_original() {
        let mut p = LeafPartition::new();
        for i in 0..PARTITION_CAPACITY {
            // Pairs of coincident points
            assert!(p.insert(&point((i / 2) as f64, 0.0, i), true));
        }
        let incoming = point(500.0, 0.0, 64);

        let rebuilt = p.rebuild(&incoming, PARTITION_CAPACITY).expect("pairs collapse");
        assert_eq!(rebuilt.size(), 65);
        assert_eq!(rebuilt.slot_count(), 33);
        assert!(rebuilt.is_grouped());
        assert_eq!(p.size(), 64);
        assert!(!p.is_grouped());
    }

    #[test]
    fn test_rebuild_without_collision_needs_more_capacity() {
        let p = full_partition();
        let incoming = point(100.0, 100.0, 64);
        assert!(p.rebuild(&incoming, PARTITION_CAPACITY).is_none());

        let grown = p.rebuild(&incoming, PARTITION_CAPACITY * 2).expect("room for all");
        assert_eq!(grown.size(), 65);
        assert_eq!(grown.capacity(), PARTITION_CAPACITY * 2);
        assert!(!grown.is_grouped());
    }

    #[test]
    fn test_ordinary_insert_does_not_regroup() {
        let mut p = LeafPartition::new();
        for i in 0..5 {
            assert!(p.insert(&point(1.0, 1.0, i), true));
        }
        assert_eq!(p.slot_count(), 5);
        assert!(!p.is_grouped());
        p.compact();
        assert_eq!(p.slot_count(), 1);
        assert!(p.is_grouped());
        assert!(p.insert(&point(1.0, 1.0, 5), true));
        assert_eq!(p.slot_count(), 2);
        // Joins the existing group rather than taking a slot
        assert!(p.insert(&point(1.0, 1.0, 6), false));
        assert_eq!(p.slot_count(), 2);
        assert_eq!(p.size(), 7);
    }

    #[test]
    fn test_from_records_groups_only_when_needed() {
        let stacked: Vec<GeometryRecord> = (0..6).map(|i| point(4.0, 4.0, i)).collect();

        let roomy = LeafPartition::from_records(stacked.clone(), 8).expect("fits one per slot");
        assert_eq!(roomy.slot_count(), 6);
        assert!(!roomy.is_grouped());

        let tight = LeafPartition::from_records(stacked, 2).expect("fits once grouped");
        assert_eq!(tight.slot_count(), 1);
        assert_eq!(tight.size(), 6);
        assert!(tight.is_grouped());

        let spread: Vec<GeometryRecord> = (0..3).map(|i| point(i as f64, 0.0, i)).collect();
        assert!(LeafPartition::from_records(spread, 2).is_none());
    }

    #[test]
    fn test_values_in_insertion_order() {
        let mut p = LeafPartition::new();
        for i in 0..4 {
            assert!(p.insert(&point(i as f64, 1.0, i), true));
        }
        let seqnos: Vec<usize> = p.values().map(GeometryRecord::seqno).collect();
        assert_eq!(seqnos, vec![0, 1, 2, 3]);
        // Restartable
        assert_eq!(p.values().count(), 4);
    }

    #[test]
    fn test_grouped_snapshot_read_back() {
        let mut p = LeafPartition::new();
        for i in 0..5 {
            assert!(p.insert(&point(2.0, 2.0, i), true));
        }
        assert!(p.insert(&point(9.0, 9.0, 5), true));
        p.compact();

        let snapshot = p.snapshot();
        assert_eq!(snapshot.count, 6);
        assert_eq!(snapshot.groups.len(), 1);
        assert_eq!(snapshot.groups[0].len(), 5);

        let json = serde_json::to_string(&snapshot).expect("serialize");
        let read: PartitionSnapshot = serde_json::from_str(&json).expect("deserialize");
        let restored = LeafPartition::from_snapshot(&read).expect("valid snapshot");
        assert_eq!(restored.size(), 6);
        assert!(restored.is_grouped());
        let mut seqnos: Vec<usize> = restored.values().map(GeometryRecord::seqno).collect();
        seqnos.sort_unstable();
        assert_eq!(seqnos, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(restored.bounds(), p.bounds());
    }

    #[test]
    fn test_ungrouped_snapshot_reads_back_ungrouped() {
        let mut p = LeafPartition::new();
        assert!(p.insert(&point(1.0, 2.0, 0), true));
        let restored = LeafPartition::from_snapshot(&p.snapshot()).expect("valid snapshot");
        assert!(!restored.is_grouped());
        assert_eq!(restored.size(), 1);
    }

    #[test]
    fn test_snapshot_count_mismatch_is_corrupt() {
        let mut p = LeafPartition::new();
        assert!(p.insert(&point(1.0, 2.0, 0), true));
        let mut snapshot = p.snapshot();
        snapshot.count = 3;
        let err = LeafPartition::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            GeoDiffError::Index {
                source: IndexErrorKind::CorruptSnapshot(_),
                ..
            }
        ));
    }
}
