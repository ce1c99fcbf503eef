//! Dataset file loading.
//!
//! Datasets are JSON documents carrying a name, a geometry type, a schema and
//! features with WKT geometries (see [`format`]). Features are read in file
//! order, so a feature's position is its sequence number.
//!
//! ```no_run
//! use geodiff::parsers::load_dataset;
//! use std::path::Path;
//!
//! let dataset = load_dataset(Path::new("roads.json")).unwrap();
//! println!("{} features", dataset.len());
//! ```

pub mod format;

pub use format::{DatasetDocument, FeatureDocument};

use crate::error::{GeoDiffError, Result};
use crate::model::Dataset;
use std::path::Path;
use tracing::debug;

/// Maximum dataset file size (512 MB).
const MAX_DATASET_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Read and parse a dataset file.
///
/// Returns an error if the file exceeds [`MAX_DATASET_FILE_SIZE`].
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let metadata = std::fs::metadata(path).map_err(|e| GeoDiffError::io(path, e))?;
    if metadata.len() > MAX_DATASET_FILE_SIZE {
        return Err(GeoDiffError::validation(format!(
            "{} is {} MB, exceeding the {} MB limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_DATASET_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| GeoDiffError::io(path, e))?;
    let dataset = parse_dataset_str(&content)?;
    debug!(
        path = %path.display(),
        name = %dataset.name,
        features = dataset.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Parse a dataset from JSON text.
pub fn parse_dataset_str(content: &str) -> Result<Dataset> {
    let document: DatasetDocument = serde_json::from_str(content)?;
    document.into_dataset()
}
