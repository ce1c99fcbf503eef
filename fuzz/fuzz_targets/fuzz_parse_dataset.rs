#![no_main]
use libfuzzer_sys::fuzz_target;
use geodiff::parsers::parse_dataset_str;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the dataset document parser.
///
/// Also wraps the input as a single feature's WKT so the geometry
/// reader and attribute coercion are reached.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_dataset_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            if let Ok(wkt) = serde_json::to_string(s) {
                let wrapped = format!(
                    r#"{{"schema":[{{"name":"id","type":"int"}}],"features":[{{"geometry":{wkt},"attributes":{{"id":1}}}}]}}"#,
                );
                let _ = parse_dataset_str(&wrapped);
            }
        }
    }
});
