//! File-backed dataset reader

#![allow(clippy::result_large_err)]

use crate::snapshot::parser::{into_dataset, parse_snapshot_file};
use blockdiff_core::errors::Result;
use blockdiff_core::model::Dataset;
use blockdiff_core::reader::DatasetReader;
use blockdiff_core::{log_op_end, log_op_error, log_op_start};
use std::path::Path;
use std::time::Instant;

/// Loads snapshot documents from disk.
///
/// Stateless; every call to `open` reads and validates the whole file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotReader;

impl SnapshotReader {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetReader for SnapshotReader {
    fn open(&self, path: &Path) -> Result<Dataset> {
        let start = Instant::now();
        let file = path.display().to_string();
        log_op_start!("load_snapshot", file = file.as_str());

        let result = parse_snapshot_file(path).and_then(|snap| into_dataset(&file, snap));
        match &result {
            Ok(ds) => {
                log_op_end!(
                    "load_snapshot",
                    duration_ms = start.elapsed().as_millis() as u64,
                    file = file.as_str(),
                    num_blocks = ds.num_blocks,
                    num_fields = ds.fields.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "load_snapshot",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    file = file.as_str()
                );
            }
        }
        result
    }
}
