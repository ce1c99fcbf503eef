//! Geometry parsing and measurement.
//!
//! Geometries travel through the dataset files as WKT text and are held in
//! memory as `geo_types::Geometry<f64>`. The [`measure`] module scores how
//! different two geometries are.

pub mod measure;

pub use measure::{DifferenceMeasure, symmetric_difference_area, symmetric_difference_length};

use crate::error::{GeoDiffError, GeometryErrorKind, Result};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

/// Geometry type discriminator, recorded per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// Classify a geo-types Geometry.
    #[must_use]
    pub fn from_geometry(geom: &Geometry<f64>) -> Self {
        match geom {
            Geometry::Point(_) => Self::Point,
            Geometry::Line(_) | Geometry::LineString(_) => Self::LineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Self::Polygon,
            Geometry::MultiPoint(_) => Self::MultiPoint,
            Geometry::MultiLineString(_) => Self::MultiLineString,
            Geometry::MultiPolygon(_) => Self::MultiPolygon,
            Geometry::GeometryCollection(_) => Self::GeometryCollection,
        }
    }

    /// Whether this type is areal, which makes area the natural difference measure.
    #[must_use]
    pub const fn is_areal(&self) -> bool {
        matches!(self, Self::Polygon | Self::MultiPolygon)
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        };
        f.write_str(name)
    }
}

/// Parse WKT string to geo-types Geometry.
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>> {
    use std::str::FromStr;
    wkt::Wkt::<f64>::from_str(text)
        .map_err(|e| GeoDiffError::geometry("parsing WKT", GeometryErrorKind::Wkt(e.to_string())))
        .and_then(|w| {
            w.try_into().map_err(|e: wkt::conversion::Error| {
                GeoDiffError::geometry("converting WKT", GeometryErrorKind::Wkt(format!("{e:?}")))
            })
        })
}

/// Format a geometry as WKT.
#[must_use]
pub fn to_wkt(geom: &Geometry<f64>) -> String {
    geom.wkt_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multilinestring() {
        let geom = parse_wkt("MULTILINESTRING((0 0,1 1),(2 2,3 3))").expect("valid WKT");
        assert!(matches!(geom, Geometry::MultiLineString(_)));
        assert_eq!(
            GeometryType::from_geometry(&geom),
            GeometryType::MultiLineString
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_wkt("LINESTRING(0 0, oops)").unwrap_err();
        assert!(matches!(err, GeoDiffError::Geometry { .. }));
    }

    #[test]
    fn test_wkt_roundtrip_preserves_geometry() {
        let geom = parse_wkt("POLYGON((0 0,4 0,4 4,0 4,0 0))").expect("valid WKT");
        let again = parse_wkt(&to_wkt(&geom)).expect("formatted WKT parses");
        assert_eq!(geom, again);
    }

    #[test]
    fn test_areal_types() {
        assert!(GeometryType::MultiPolygon.is_areal());
        assert!(!GeometryType::MultiLineString.is_areal());
        assert_eq!(GeometryType::Point.to_string(), "Point");
    }
}
