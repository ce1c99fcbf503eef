//! Geometry records keyed by their envelope center.

use super::Envelope;
use crate::error::{GeoDiffError, GeometryErrorKind, Result};
use geo_types::{Coord, Geometry};
use std::sync::Arc;

/// One geometric feature with its derived envelope and center point.
///
/// Envelope and center are computed exactly once, at construction, and never
/// recomputed: the record is immutable for the whole comparison run. The
/// geometry itself is shared with the owning [`Dataset`](super::Dataset).
#[derive(Debug, Clone)]
pub struct GeometryRecord {
    geometry: Arc<Geometry<f64>>,
    envelope: Envelope,
    center: Coord<f64>,
    seqno: usize,
}

impl GeometryRecord {
    /// Build a record for the feature at position `seqno` of its collection.
    ///
    /// Fails when the geometry has no coordinates, since such a record has no
    /// center to index.
    pub fn new(geometry: Arc<Geometry<f64>>, seqno: usize) -> Result<Self> {
        let envelope = Envelope::of_geometry(&geometry).ok_or_else(|| {
            GeoDiffError::geometry(format!("feature {seqno}"), GeometryErrorKind::Empty)
        })?;
        Ok(Self {
            geometry,
            center: envelope.center(),
            envelope,
            seqno,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Center of the envelope; the key under which the record is indexed.
    #[must_use]
    pub const fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Position of the record in its originating collection.
    #[must_use]
    pub const fn seqno(&self) -> usize {
        self.seqno
    }
}

impl std::fmt::Display for GeometryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:({}, {})", self.seqno, self.center.x, self.center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::parse_wkt;

    #[test]
    fn test_center_is_envelope_center() {
        let geom = parse_wkt("LINESTRING(0 0,2 0,2 6)").expect("valid WKT");
        let record = GeometryRecord::new(Arc::new(geom), 7).expect("non-empty geometry");
        assert_eq!(record.seqno(), 7);
        assert_eq!(record.envelope(), &Envelope::new(0.0, 0.0, 2.0, 6.0));
        // Envelope center, not the line's centroid
        assert_eq!(record.center(), Coord { x: 1.0, y: 3.0 });
        assert_eq!(record.to_string(), "7:(1, 3)");
    }

    #[test]
    fn test_empty_geometry_is_rejected() {
        let geom = Geometry::MultiLineString(geo_types::MultiLineString::new(vec![]));
        let err = GeometryRecord::new(Arc::new(geom), 0).unwrap_err();
        assert!(matches!(
            err,
            GeoDiffError::Geometry {
                source: GeometryErrorKind::Empty,
                ..
            }
        ));
    }
}
