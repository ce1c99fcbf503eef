//! Geometric-difference scoring.
//!
//! A candidate pair is scored by the measure of the symmetric difference of
//! the two geometries: its length for line-dominant datasets, its area for
//! polygon-dominant ones. Lower is more similar; identical geometries score
//! zero under either measure.
//!
//! Area comes straight from `geo`'s boolean operations. `geo` has no boolean
//! operations on linework, so the length measure is computed here from
//! collinear segment overlap: `len(A △ B) = len(A) + len(B) - 2 * overlap(A, B)`.

use clap::ValueEnum;
use geo::{Area, BooleanOps, Euclidean, Length};
use geo_types::{Geometry, Line, MultiPolygon, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Perpendicular distance, relative to segment length, under which two
/// segments are treated as lying on the same line.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Which measure of the symmetric difference scores a candidate.
///
/// This is a caller-selected policy; it is not inferred from the data.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum DifferenceMeasure {
    /// Length of the symmetric difference (line datasets)
    #[default]
    Length,
    /// Area of the symmetric difference (polygon datasets)
    Area,
}

impl DifferenceMeasure {
    /// Similarity threshold matching the unit of this measure.
    #[must_use]
    pub const fn default_threshold(&self) -> f64 {
        match self {
            Self::Length => 0.1,
            Self::Area => 1.0,
        }
    }

    /// Score the difference between two geometries.
    #[must_use]
    pub fn score(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> f64 {
        match self {
            Self::Length => symmetric_difference_length(a, b),
            Self::Area => symmetric_difference_area(a, b),
        }
    }
}

impl std::fmt::Display for DifferenceMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Area => write!(f, "area"),
        }
    }
}

/// Length of the symmetric difference of the linework of two geometries.
///
/// Polygons contribute their rings; points contribute nothing, so two point
/// geometries always score zero.
#[must_use]
pub fn symmetric_difference_length(a: &Geometry<f64>, b: &Geometry<f64>) -> f64 {
    let segs_a = segments(a);
    let segs_b = segments(b);

    let len_a: f64 = segs_a.iter().map(|l| l.length::<Euclidean>()).sum();
    let len_b: f64 = segs_b.iter().map(|l| l.length::<Euclidean>()).sum();

    let mut overlap = 0.0;
    for sa in &segs_a {
        for sb in &segs_b {
            overlap += collinear_overlap(sa, sb);
        }
    }

    ((len_a - overlap).max(0.0) + (len_b - overlap).max(0.0)).max(0.0)
}

/// Area of the symmetric difference of the areal parts of two geometries.
#[must_use]
pub fn symmetric_difference_area(a: &Geometry<f64>, b: &Geometry<f64>) -> f64 {
    let pa = polygons(a);
    let pb = polygons(b);

    match (pa.0.is_empty(), pb.0.is_empty()) {
        (true, true) => 0.0,
        (false, true) => pa.unsigned_area(),
        (true, false) => pb.unsigned_area(),
        (false, false) => pa.xor(&pb).unsigned_area(),
    }
}

/// Length of the stretch shared by two segments when they are collinear.
fn collinear_overlap(a: &Line<f64>, b: &Line<f64>) -> f64 {
    let d = a.delta();
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq == 0.0 {
        return 0.0;
    }
    if !boxes_touch(a, b) {
        return 0.0;
    }

    let len = len_sq.sqrt();
    let tolerance = COLLINEAR_TOLERANCE * len.max(1.0);
    let off = |c: geo_types::Coord<f64>| (d.x * (c.y - a.start.y) - d.y * (c.x - a.start.x)) / len;
    if off(b.start).abs() > tolerance || off(b.end).abs() > tolerance {
        return 0.0;
    }

    let param = |c: geo_types::Coord<f64>| {
        (d.x * (c.x - a.start.x) + d.y * (c.y - a.start.y)) / len_sq
    };
    let (t0, t1) = {
        let (s, e) = (param(b.start), param(b.end));
        (s.min(e), s.max(e))
    };
    let lo = t0.max(0.0);
    let hi = t1.min(1.0);
    if hi <= lo { 0.0 } else { (hi - lo) * len }
}

fn boxes_touch(a: &Line<f64>, b: &Line<f64>) -> bool {
    let slack = COLLINEAR_TOLERANCE;
    a.start.x.min(a.end.x) <= b.start.x.max(b.end.x) + slack
        && b.start.x.min(b.end.x) <= a.start.x.max(a.end.x) + slack
        && a.start.y.min(a.end.y) <= b.start.y.max(b.end.y) + slack
        && b.start.y.min(b.end.y) <= a.start.y.max(a.end.y) + slack
}

/// Non-degenerate segments of a geometry's linework.
fn segments(geom: &Geometry<f64>) -> Vec<Line<f64>> {
    let mut out = Vec::new();
    collect_segments(geom, &mut out);
    out.retain(|l| l.start != l.end);
    out
}

fn collect_segments(geom: &Geometry<f64>, out: &mut Vec<Line<f64>>) {
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::Line(l) => out.push(*l),
        Geometry::LineString(ls) => out.extend(ls.lines()),
        Geometry::MultiLineString(mls) => {
            for ls in &mls.0 {
                out.extend(ls.lines());
            }
        }
        Geometry::Polygon(p) => push_rings(p, out),
        Geometry::MultiPolygon(mp) => {
            for p in &mp.0 {
                push_rings(p, out);
            }
        }
        Geometry::Rect(r) => push_rings(&r.to_polygon(), out),
        Geometry::Triangle(t) => push_rings(&t.to_polygon(), out),
        Geometry::GeometryCollection(gc) => {
            for g in &gc.0 {
                collect_segments(g, out);
            }
        }
    }
}

fn push_rings(p: &Polygon<f64>, out: &mut Vec<Line<f64>>) {
    out.extend(p.exterior().lines());
    for ring in p.interiors() {
        out.extend(ring.lines());
    }
}

/// Areal parts of a geometry as one multipolygon.
fn polygons(geom: &Geometry<f64>) -> MultiPolygon<f64> {
    let mut out = Vec::new();
    collect_polygons(geom, &mut out);
    MultiPolygon::new(out)
}

fn collect_polygons(geom: &Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geom {
        Geometry::Polygon(p) => out.push(p.clone()),
        Geometry::MultiPolygon(mp) => out.extend(mp.0.iter().cloned()),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in &gc.0 {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::parse_wkt;

    fn geom(wkt: &str) -> Geometry<f64> {
        parse_wkt(wkt).expect("test WKT is valid")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_lines_score_zero() {
        let a = geom("MULTILINESTRING((0 0,3 4,6 4))");
        assert!(approx(symmetric_difference_length(&a, &a), 0.0));
    }

    #[test]
    fn test_differently_noded_lines_score_zero() {
        let a = geom("LINESTRING(0 0,10 0)");
        let b = geom("LINESTRING(0 0,4 0,10 0)");
        assert!(approx(symmetric_difference_length(&a, &b), 0.0));
    }

    #[test]
    fn test_reversed_line_scores_zero() {
        let a = geom("LINESTRING(0 0,10 0)");
        let b = geom("LINESTRING(10 0,0 0)");
        assert!(approx(symmetric_difference_length(&a, &b), 0.0));
    }

    #[test]
    fn test_partial_overlap_length() {
        let a = geom("LINESTRING(0 0,10 0)");
        let b = geom("LINESTRING(5 0,15 0)");
        // 5 units unique on each side
        assert!(approx(symmetric_difference_length(&a, &b), 10.0));
    }

    #[test]
    fn test_parallel_offset_has_no_overlap() {
        let a = geom("LINESTRING(0 0,10 0)");
        let b = geom("LINESTRING(0 0.005,10 0.005)");
        assert!(approx(symmetric_difference_length(&a, &b), 20.0));
    }

    #[test]
    fn test_points_score_zero_length() {
        let a = geom("POINT(1 1)");
        let b = geom("POINT(1.005 1)");
        assert!(approx(symmetric_difference_length(&a, &b), 0.0));
        assert!(approx(symmetric_difference_area(&a, &b), 0.0));
    }

    #[test]
    fn test_identical_polygons_score_zero_area() {
        let a = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
        assert!(symmetric_difference_area(&a, &a) < 1e-9);
    }

    #[test]
    fn test_shifted_polygon_area() {
        let a = geom("POLYGON((0 0,4 0,4 4,0 4,0 0))");
        let b = geom("POLYGON((1 0,5 0,5 4,1 4,1 0))");
        // Two 1x4 strips
        assert!((symmetric_difference_area(&a, &b) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_against_line_area() {
        let a = geom("POLYGON((0 0,2 0,2 2,0 2,0 0))");
        let b = geom("LINESTRING(0 0,1 1)");
        assert!(approx(symmetric_difference_area(&a, &b), 4.0));
    }

    #[test]
    fn test_measure_dispatch_and_thresholds() {
        let a = geom("LINESTRING(0 0,10 0)");
        let b = geom("LINESTRING(0 0,10.05 0)");
        assert!(approx(DifferenceMeasure::Length.score(&a, &b), 0.05));
        assert!(approx(DifferenceMeasure::Length.default_threshold(), 0.1));
        assert!(approx(DifferenceMeasure::Area.default_threshold(), 1.0));
        assert_eq!(DifferenceMeasure::default(), DifferenceMeasure::Length);
    }
}
