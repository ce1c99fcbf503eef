//! Axis-aligned envelopes in dataset coordinates.

use geo::BoundingRect;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// Bounds are inclusive on every side, so a degenerate envelope (zero width
/// and height) still contains its single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Create an envelope from its corners, normalizing their order.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Degenerate envelope covering a single point.
    #[must_use]
    pub const fn from_coord(c: Coord<f64>) -> Self {
        Self {
            min_x: c.x,
            min_y: c.y,
            max_x: c.x,
            max_y: c.y,
        }
    }

    /// Envelope of a geometry, `None` when the geometry has no coordinates.
    #[must_use]
    pub fn of_geometry(geom: &Geometry<f64>) -> Option<Self> {
        geom.bounding_rect().map(|rect| Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }

    /// Union of all envelopes, `None` for an empty iterator.
    pub fn union_all<'a>(envelopes: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        envelopes.into_iter().fold(None, |acc, e| match acc {
            Some(u) => Some(u.union(e)),
            None => Some(*e),
        })
    }

    /// Center of the envelope.
    #[must_use]
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Smallest envelope covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Envelope grown by `distance` on every side.
    #[must_use]
    pub fn expanded_by(&self, distance: f64) -> Self {
        Self {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    #[must_use]
    pub fn contains_coord(&self, c: Coord<f64>) -> bool {
        self.min_x <= c.x && c.x <= self.max_x && self.min_y <= c.y && c.y <= self.max_y
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Split into four quadrants: SW, SE, NW, NE.
    #[must_use]
    pub fn quadrants(&self) -> [Self; 4] {
        let c = self.center();
        [
            Self::new(self.min_x, self.min_y, c.x, c.y),
            Self::new(c.x, self.min_y, self.max_x, c.y),
            Self::new(self.min_x, c.y, c.x, self.max_y),
            Self::new(c.x, c.y, self.max_x, self.max_y),
        ]
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point};

    #[test]
    fn test_new_normalizes_corners() {
        let e = Envelope::new(5.0, 4.0, 1.0, 2.0);
        assert_eq!(e.min_x, 1.0);
        assert_eq!(e.min_y, 2.0);
        assert_eq!(e.max_x, 5.0);
        assert_eq!(e.max_y, 4.0);
    }

    #[test]
    fn test_of_geometry_line() {
        let geom = Geometry::LineString(line_string![(x: 0.0, y: 1.0), (x: 4.0, y: 3.0)]);
        let e = Envelope::of_geometry(&geom).expect("line has an envelope");
        assert_eq!(e, Envelope::new(0.0, 1.0, 4.0, 3.0));
        assert_eq!(e.center(), Coord { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_point_envelope_is_degenerate() {
        let geom = Geometry::Point(point!(x: 3.0, y: 7.0));
        let e = Envelope::of_geometry(&geom).expect("point has an envelope");
        assert_eq!(e.min_x, e.max_x);
        assert_eq!(e.min_y, e.max_y);
        assert!(e.contains_coord(Coord { x: 3.0, y: 7.0 }));
    }

    #[test]
    fn test_expanded_by_is_inclusive() {
        let e = Envelope::from_coord(Coord { x: 1.0, y: 1.0 }).expanded_by(0.5);
        assert!(e.contains_coord(Coord { x: 1.5, y: 0.5 }));
        assert!(!e.contains_coord(Coord { x: 1.6, y: 1.0 }));
    }

    #[test]
    fn test_union_and_intersects() {
        let a = Envelope::new(0.0, 0.0, 1.0, 1.0);
        let b = Envelope::new(2.0, 2.0, 3.0, 3.0);
        assert!(!a.intersects(&b));
        let u = a.union(&b);
        assert_eq!(u, Envelope::new(0.0, 0.0, 3.0, 3.0));
        assert!(u.intersects(&a));
        assert_eq!(Envelope::union_all([a, b].iter()), Some(u));
        assert_eq!(Envelope::union_all(std::iter::empty()), None);
    }

    #[test]
    fn test_quadrants_cover_parent() {
        let e = Envelope::new(0.0, 0.0, 4.0, 2.0);
        let q = e.quadrants();
        assert_eq!(q[0], Envelope::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(q[3], Envelope::new(2.0, 1.0, 4.0, 2.0));
        assert_eq!(Envelope::union_all(q.iter()), Some(e));
    }
}
