//! Point-keyed spatial index over geometry records.
//!
//! The index is abstracted behind [`SpatialIndex`] so the matching engine
//! depends only on `insert` and `query`. [`PointQuadTree`] implements it by
//! subdividing space into quadrants, storing values in leaf partitions built
//! through a caller-supplied factory. [`LeafPartition`] is the partition used
//! for geometry records: bounded capacity, with coincident points grouped
//! into a single slot.

pub mod partition;
pub mod quadtree;

pub use partition::{LeafPartition, PARTITION_CAPACITY, PartitionSnapshot, RecordSnapshot, Slot};
pub use quadtree::{MAX_DEPTH, PointQuadTree};

use crate::model::{Envelope, GeometryRecord};
use geo_types::Coord;

/// Quadtree of geometry records with standard leaf partitions.
pub type RecordIndex = PointQuadTree<
    GeometryRecord,
    LeafPartition<GeometryRecord>,
    fn(&Envelope) -> LeafPartition<GeometryRecord>,
>;

fn record_leaf(_: &Envelope) -> LeafPartition<GeometryRecord> {
    LeafPartition::new()
}

/// Empty record index covering `bounds`.
#[must_use]
pub fn record_index(bounds: Envelope) -> RecordIndex {
    PointQuadTree::new(bounds, record_leaf as fn(&Envelope) -> LeafPartition<GeometryRecord>)
}

/// A value indexed under a single point.
pub trait PointValue {
    /// The key point.
    fn point(&self) -> Coord<f64>;

    /// Extent of the value, used for partition bounds.
    fn envelope(&self) -> Envelope;
}

impl PointValue for GeometryRecord {
    fn point(&self) -> Coord<f64> {
        self.center()
    }

    fn envelope(&self) -> Envelope {
        *GeometryRecord::envelope(self)
    }
}

/// Storage unit at a terminal node of a [`PointQuadTree`].
pub trait PointPartition<V> {
    /// Try to store `value`.
    ///
    /// Succeeds only while a slot is free; a full partition returns `false`
    /// untouched. With `prefer_fast_path` the value always takes a slot of
    /// its own; without it, it may join an existing group at its point.
    fn insert(&mut self, value: &V, prefer_fast_path: bool) -> bool;

    /// Number of stored values.
    fn size(&self) -> usize;

    /// All stored values.
    fn values(&self) -> Box<dyn Iterator<Item = &V> + '_>;

    /// Union of the stored values' envelopes.
    fn bounds(&self) -> Envelope;

    /// Maximum number of slots.
    fn capacity(&self) -> usize;

    /// A replacement partition holding every stored value plus `incoming`
    /// in at most `capacity` slots, or `None` if they cannot fit.
    ///
    /// Must succeed when `capacity` is at least the total number of values.
    fn rebuild(&self, incoming: &V, capacity: usize) -> Option<Self>
    where
        Self: Sized;

    /// Consume the partition, returning its values.
    fn into_values(self) -> Vec<V>
    where
        Self: Sized;
}

/// Spatial index keyed by points.
pub trait SpatialIndex<V> {
    /// Insert a value; `false` if the index cannot hold it.
    fn insert(&mut self, value: V) -> bool;

    /// Values whose key point lies inside `envelope` (bounds inclusive).
    fn query<'a>(&'a self, envelope: &Envelope) -> Box<dyn Iterator<Item = &'a V> + 'a>;

    /// Number of stored values.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
