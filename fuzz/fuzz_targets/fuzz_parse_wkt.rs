#![no_main]
use libfuzzer_sys::fuzz_target;
use geodiff::geometry::parse_wkt;
use geodiff::model::GeometryRecord;
use std::sync::Arc;

/// Fuzz WKT parsing and record construction.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(geometry) = parse_wkt(s)
    {
        let _ = GeometryRecord::new(Arc::new(geometry), 0);
    }
});
