//! Output generation for comparison results.
//!
//! A run writes into one output directory:
//! - id lists (`deleteds`, `updates`, `inserteds`), always, each only when
//!   it has entries
//! - feature subsets (`deleteds_features/`, `updateds_features/`,
//!   `inserteds_features/`), on request
//!
//! Each kind of output is a [`ReportWriter`]; [`create_writers`] picks the
//! set a configuration asks for. Dataset files are written in the same JSON
//! layout [`crate::parsers`] reads.

mod features;
mod id_lists;
mod summary;

pub use features::{DELETED_FEATURES_DIR, FeatureSetWriter, INSERTED_FEATURES_DIR, UPDATED_FEATURES_DIR};
pub use id_lists::{DELETED_IDS_FILE, INSERTED_IDS_FILE, IdListWriter, UPDATED_IDS_FILE};
pub use summary::SummaryReporter;

use crate::config::OutputConfig;
use crate::diff::ChangeReport;
use crate::error::{GeoDiffError, Result};
use crate::index::{PartitionSnapshot, RecordIndex};
use crate::model::Dataset;
use crate::parsers::DatasetDocument;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of a dataset written inside a feature directory.
pub const FEATURES_FILE: &str = "features.json";

/// Everything a writer may draw from.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub report: &'a ChangeReport,
    pub before: &'a Dataset,
    pub after: &'a Dataset,
}

/// Trait for output writers
pub trait ReportWriter {
    /// Write this writer's files under `dir`, returning the paths written.
    fn write(&self, ctx: &ReportContext<'_>, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Writers requested by an output configuration.
#[must_use]
pub fn create_writers(config: &OutputConfig) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = vec![Box::new(IdListWriter::new())];
    if config.write_features {
        writers.push(Box::new(FeatureSetWriter::new()));
    }
    writers
}

/// Write a dataset as a JSON dataset file, preserving name, schema and
/// geometry type.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    write_json(path, &DatasetDocument::from(dataset))
}

/// Write the leaf partitions of an index as a JSON array of snapshots.
pub fn write_index_dump(path: &Path, index: &RecordIndex) -> Result<()> {
    let snapshots: Vec<PartitionSnapshot> = index
        .partitions()
        .into_iter()
        .map(|p| p.snapshot())
        .collect();
    write_json(path, &snapshots)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| GeoDiffError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| GeoDiffError::io(path, e))
}
