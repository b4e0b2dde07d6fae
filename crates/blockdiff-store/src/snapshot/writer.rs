//! Snapshot writer
//!
//! Serializes an in-memory dataset back into Snapshot Format v1. Used to
//! produce fixtures and to hand modified datasets to the command line tool.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, serialization, Result};
use crate::snapshot::format_v1::{
    SnapshotCoordinates, SnapshotField, SnapshotTopology, SnapshotV1,
};
use crate::snapshot::parser::SnapshotFormat;
use blockdiff_core::model::Dataset;
use ndarray::Array2;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn rows(arr: &Array2<f64>) -> Vec<Vec<f64>> {
    arr.outer_iter().map(|row| row.to_vec()).collect()
}

fn group(arrays: &BTreeMap<String, Array2<f64>>) -> BTreeMap<String, Vec<Vec<f64>>> {
    arrays.iter().map(|(k, v)| (k.clone(), rows(v))).collect()
}

impl From<&Dataset> for SnapshotV1 {
    fn from(ds: &Dataset) -> Self {
        let topo = &ds.topology;
        SnapshotV1 {
            schema_version: 1,
            time: Some(ds.time),
            block_shape: ds.block_shape,
            num_blocks: ds.num_blocks,
            total_cells_real: Some(ds.total_cells_real),
            info: ds.info.clone(),
            params: ds.params.clone(),
            coordinates: SnapshotCoordinates {
                x: rows(&ds.coordinates.x),
                y: rows(&ds.coordinates.y),
                z: rows(&ds.coordinates.z),
            },
            topology: SnapshotTopology {
                logical_locations: topo
                    .logical_locations
                    .as_ref()
                    .map(|ll| ll.outer_iter().map(|r| [r[0], r[1], r[2]]).collect()),
                levels: topo.levels.as_ref().map(|l| l.to_vec()),
                locations: group(&topo.locations),
                volume_locations: group(&topo.volume_locations),
            },
            fields: ds
                .fields
                .iter()
                .map(|(name, arr)| {
                    let field = SnapshotField {
                        components: (arr.ndim() == 5).then(|| arr.shape()[4]),
                        data: arr.iter().copied().collect(),
                    };
                    (name.clone(), field)
                })
                .collect(),
        }
    }
}

/// Render a snapshot in the given encoding
///
/// JSON cannot represent NaN or infinities; use YAML for such data.
pub fn snapshot_to_string(snapshot: &SnapshotV1, format: SnapshotFormat) -> Result<String> {
    match format {
        SnapshotFormat::Json => serde_json::to_string_pretty(snapshot)
            .map_err(|e| serialization(&format!("JSON encode error: {}", e))),
        SnapshotFormat::Yaml => serde_yaml::to_string(snapshot)
            .map_err(|e| serialization(&format!("YAML encode error: {}", e))),
    }
}

/// Write a snapshot file, choosing the encoding from the extension
pub fn write_snapshot_file(path: &Path, snapshot: &SnapshotV1) -> Result<()> {
    let text = snapshot_to_string(snapshot, SnapshotFormat::from_path(path))?;
    fs::write(path, text).map_err(|e| io_error(path, "write_snapshot", e))
}
