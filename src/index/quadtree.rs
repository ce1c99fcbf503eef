//! Bounded-fanout point quadtree.

use super::{PointPartition, PointValue, SpatialIndex};
use crate::model::Envelope;
use geo_types::Coord;
use std::marker::PhantomData;
use tracing::debug;

/// Deepest level a leaf may be split to.
pub const MAX_DEPTH: usize = 24;

enum Node<P> {
    Leaf {
        bounds: Envelope,
        partition: P,
    },
    Branch {
        bounds: Envelope,
        children: Box<[Node<P>; 4]>,
    },
}

impl<P> Node<P> {
    const fn bounds(&self) -> &Envelope {
        match self {
            Self::Leaf { bounds, .. } | Self::Branch { bounds, .. } => bounds,
        }
    }
}

/// Child index for a point: SW, SE, NW, NE, matching [`Envelope::quadrants`].
fn quadrant(bounds: &Envelope, p: Coord<f64>) -> usize {
    let c = bounds.center();
    usize::from(p.y >= c.y) * 2 + usize::from(p.x >= c.x)
}

/// Point quadtree storing values in partitions created by a factory.
///
/// Values go into leaves with `prefer_fast_path = false`. When a leaf refuses
/// one, the tree first replaces the leaf wholesale with a
/// [`rebuild`](PointPartition::rebuild) that groups coincident values, and
/// splits it into four children only when that does not fit. Leaves at
/// [`MAX_DEPTH`] are never split; they are rebuilt with a larger capacity
/// instead.
pub struct PointQuadTree<V, P, F> {
    root: Node<P>,
    factory: F,
    len: usize,
    _values: PhantomData<V>,
}

impl<V, P, F> PointQuadTree<V, P, F>
where
    V: PointValue,
    P: PointPartition<V>,
    F: Fn(&Envelope) -> P,
{
    /// Empty tree covering `bounds`; leaves are built by `factory`.
    pub fn new(bounds: Envelope, factory: F) -> Self {
        let partition = factory(&bounds);
        Self {
            root: Node::Leaf { bounds, partition },
            factory,
            len: 0,
            _values: PhantomData,
        }
    }

    /// Envelope covered by the tree.
    #[must_use]
    pub const fn bounds(&self) -> &Envelope {
        self.root.bounds()
    }

    /// All leaf partitions, in depth-first SW, SE, NW, NE order.
    pub fn partitions(&self) -> Vec<&P> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { partition, .. } => out.push(partition),
                Node::Branch { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Depth of the deepest leaf; zero for a tree that never split.
    #[must_use]
    pub fn depth(&self) -> usize {
        fn walk<P>(node: &Node<P>) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Branch { children, .. } => 1 + children.iter().map(walk).max().unwrap_or(0),
            }
        }
        walk(&self.root)
    }

    fn insert_at(node: &mut Node<P>, value: V, depth: usize, factory: &F) -> bool {
        let bounds = match node {
            Node::Branch { bounds, children } => {
                let idx = quadrant(bounds, value.point());
                return Self::insert_at(&mut children[idx], value, depth + 1, factory);
            }
            Node::Leaf { bounds, partition } => {
                if partition.insert(&value, false) {
                    return true;
                }
                let capacity = partition.capacity();
                if let Some(rebuilt) = partition.rebuild(&value, capacity) {
                    *partition = rebuilt;
                    return true;
                }
                if depth >= MAX_DEPTH {
                    let grown = capacity
                        .saturating_mul(2)
                        .max(partition.size().saturating_add(1));
                    let Some(rebuilt) = partition.rebuild(&value, grown) else {
                        return false;
                    };
                    debug!(depth, capacity = grown, bounds = %bounds, "Grew leaf at maximum depth");
                    *partition = rebuilt;
                    return true;
                }
                *bounds
            }
        };

        let children = Box::new(bounds.quadrants().map(|b| Node::Leaf {
            partition: factory(&b),
            bounds: b,
        }));
        let old = std::mem::replace(node, Node::Branch { bounds, children });
        if let Node::Leaf { partition, .. } = old {
            for moved in partition.into_values() {
                let placed = Self::insert_at(node, moved, depth, factory);
                debug_assert!(placed, "a split leaf's values always fit its children");
            }
        }
        Self::insert_at(node, value, depth, factory)
    }

    fn collect<'a>(node: &'a Node<P>, envelope: &Envelope, out: &mut Vec<&'a V>) {
        if !node.bounds().intersects(envelope) {
            return;
        }
        match node {
            Node::Leaf { partition, .. } => {
                if partition.size() == 0 || !partition.bounds().intersects(envelope) {
                    return;
                }
                out.extend(
                    partition
                        .values()
                        .filter(|v| envelope.contains_coord(v.point())),
                );
            }
            Node::Branch { children, .. } => {
                for child in children.iter() {
                    Self::collect(child, envelope, out);
                }
            }
        }
    }
}

impl<V, P, F> SpatialIndex<V> for PointQuadTree<V, P, F>
where
    V: PointValue,
    P: PointPartition<V>,
    F: Fn(&Envelope) -> P,
{
    fn insert(&mut self, value: V) -> bool {
        if !self.root.bounds().contains_coord(value.point()) {
            return false;
        }
        let inserted = Self::insert_at(&mut self.root, value, 0, &self.factory);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn query<'a>(&'a self, envelope: &Envelope) -> Box<dyn Iterator<Item = &'a V> + 'a> {
        let mut out = Vec::new();
        Self::collect(&self.root, envelope, &mut out);
        Box::new(out.into_iter())
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<V, P, F> std::fmt::Debug for PointQuadTree<V, P, F>
where
    V: PointValue,
    P: PointPartition<V>,
    F: Fn(&Envelope) -> P,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointQuadTree")
            .field("bounds", self.bounds())
            .field("len", &self.len)
            .field("leaves", &self.partitions().len())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{PARTITION_CAPACITY, RecordIndex, record_index};
    use crate::model::GeometryRecord;
    use std::sync::Arc;

    fn tree(bounds: Envelope) -> RecordIndex {
        record_index(bounds)
    }

    fn point(x: f64, y: f64, seqno: usize) -> GeometryRecord {
        let geom = geo_types::Geometry::Point(geo_types::Point::new(x, y));
        GeometryRecord::new(Arc::new(geom), seqno).expect("points have envelopes")
    }

    #[test]
    fn test_rejects_points_outside_root() {
        let mut t = tree(Envelope::new(0.0, 0.0, 10.0, 10.0));
        assert!(!t.insert(point(11.0, 5.0, 0)));
        assert!(t.is_empty());
    }

    #[test]
    fn test_splits_when_leaf_overflows() {
        let mut t = tree(Envelope::new(0.0, 0.0, 100.0, 100.0));
        for i in 0..200 {
            let x = (i % 20) as f64 * 5.0;
            let y = (i / 20) as f64 * 10.0;
            assert!(t.insert(point(x, y, i)));
        }
        assert_eq!(t.len(), 200);
        assert!(t.depth() >= 1);
        assert!(t.partitions().len() >= 4);
        let total: usize = t.partitions().iter().map(|p| p.size()).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn test_query_returns_exactly_covered_points() {
        let mut t = tree(Envelope::new(0.0, 0.0, 99.0, 99.0));
        for i in 0..100 {
            let (x, y) = ((i % 10) as f64 * 11.0, (i / 10) as f64 * 11.0);
            assert!(t.insert(point(x, y, i)));
        }
        let query = Envelope::new(10.0, 10.0, 33.0, 22.0);
        let mut found: Vec<usize> = t.query(&query).map(GeometryRecord::seqno).collect();
        found.sort_unstable();
        // x in {11, 22, 33}, y in {11, 22}
        assert_eq!(found, vec![11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn test_query_bounds_are_inclusive() {
        let mut t = tree(Envelope::new(0.0, 0.0, 10.0, 10.0));
        assert!(t.insert(point(5.0, 5.0, 0)));
        let hits = t.query(&Envelope::new(5.0, 5.0, 6.0, 6.0)).count();
        assert_eq!(hits, 1);
        let misses = t.query(&Envelope::new(5.0001, 5.0, 6.0, 6.0)).count();
        assert_eq!(misses, 0);
    }

    #[test]
    fn test_coincident_points_beyond_capacity_are_grouped() {
        let mut t = tree(Envelope::new(0.0, 0.0, 10.0, 10.0));
        let n = PARTITION_CAPACITY * 3;
        for i in 0..n {
            assert!(t.insert(point(4.0, 4.0, i)));
        }
        assert_eq!(t.len(), n);
        assert_eq!(t.depth(), 0);
        assert!(t.partitions()[0].is_grouped());
        assert_eq!(t.query(&Envelope::new(4.0, 4.0, 4.0, 4.0)).count(), n);
    }

    #[test]
    fn test_degenerate_root_holds_collinear_points() {
        let mut t = tree(Envelope::new(0.0, 3.0, 100.0, 3.0));
        for i in 0..150 {
            assert!(t.insert(point(i as f64 * 0.5, 3.0, i)));
        }
        assert_eq!(t.len(), 150);
        assert_eq!(t.query(&Envelope::new(0.0, 3.0, 100.0, 3.0)).count(), 150);
    }

    #[test]
    fn test_dense_cluster_at_max_depth_is_held() {
        let mut t = tree(Envelope::new(0.0, 0.0, 1_000_000.0, 1_000_000.0));
        let n = PARTITION_CAPACITY * 2 + 5;
        for i in 0..n {
            assert!(t.insert(point(500.0 + i as f64 * 0.0001, 500.0, i)));
        }
        assert_eq!(t.len(), n);
        assert_eq!(t.depth(), MAX_DEPTH);
        assert!(t.partitions().iter().any(|p| p.capacity() > PARTITION_CAPACITY));

        let window = Envelope::new(500.0, 500.0, 500.0 + 10.0 * 0.0001, 500.0);
        let mut found: Vec<usize> = t.query(&window).map(GeometryRecord::seqno).collect();
        found.sort_unstable();
        assert_eq!(found.len(), 11);
        assert_eq!(found.first(), Some(&0));
    }

    #[test]
    fn test_full_leaf_is_replaced_by_grouped_rebuild() {
        let mut t = tree(Envelope::new(0.0, 0.0, 10.0, 10.0));
        for i in 0..PARTITION_CAPACITY - 1 {
            assert!(t.insert(point(2.0, 2.0, i)));
        }
        assert!(t.insert(point(7.0, 7.0, 63)));
        assert!(t.insert(point(2.0, 2.0, 64)));

        assert_eq!(t.depth(), 0);
        let leaf = t.partitions()[0];
        assert!(leaf.is_grouped());
        assert_eq!(leaf.slot_count(), 2);
        assert_eq!(leaf.size(), PARTITION_CAPACITY + 1);
        assert!(leaf.slot_count() <= leaf.capacity());
    }
}
