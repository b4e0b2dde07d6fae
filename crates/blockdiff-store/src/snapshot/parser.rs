//! Snapshot parser with validation
//!
//! Decodes JSON or YAML, validates the document against its declared block
//! layout and converts it into a [`Dataset`].

#![allow(clippy::result_large_err)]

use crate::errors::{invalid_snapshot, io_error, parse_error, Result};
use crate::snapshot::format_v1::{SnapshotTopology, SnapshotV1};
use blockdiff_core::model::{BlockCoordinates, BlockTopology, Dataset};
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Supported snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the encoding from the file extension. Anything that is not
    /// `.json` is read as YAML, which also accepts JSON documents.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }
}

/// Parse and validate a snapshot file
pub fn parse_snapshot_file(path: &Path) -> Result<SnapshotV1> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, "read_snapshot", e))?;

    parse_snapshot_str(&content, SnapshotFormat::from_path(path)).map_err(|e| {
        let file = path.display().to_string();
        e.with_path(file)
    })
}

/// Parse and validate a snapshot from a string
pub fn parse_snapshot_str(content: &str, format: SnapshotFormat) -> Result<SnapshotV1> {
    let snapshot: SnapshotV1 = match format {
        SnapshotFormat::Json => serde_json::from_str(content)
            .map_err(|e| parse_error(&format!("JSON parse error: {}", e)))?,
        SnapshotFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| parse_error(&format!("YAML parse error: {}", e)))?,
    };

    validate_snapshot(&snapshot)?;

    Ok(snapshot)
}

/// Validate a parsed snapshot
fn validate_snapshot(snap: &SnapshotV1) -> Result<()> {
    // Validate schema version
    if snap.schema_version != 1 {
        return Err(invalid_snapshot(&format!(
            "Unsupported schema_version: {}. Expected 1",
            snap.schema_version
        )));
    }

    let [nz, ny, nx] = snap.block_shape;
    if snap.block_shape.contains(&0) {
        return Err(invalid_snapshot(&format!(
            "block_shape {:?} has an empty axis",
            snap.block_shape
        )));
    }
    let n = snap.num_blocks;
    if n == 0 {
        return Err(invalid_snapshot("num_blocks must be at least 1"));
    }

    // Coordinates: one row per block, one value per cell along the axis
    for (axis, rows, width) in [
        ("x", &snap.coordinates.x, nx),
        ("y", &snap.coordinates.y, ny),
        ("z", &snap.coordinates.z, nz),
    ] {
        check_rows(&format!("coordinates.{}", axis), rows, n, Some(width))?;
    }

    // Topology
    if let Some(ll) = &snap.topology.logical_locations {
        if ll.len() != n {
            return Err(invalid_snapshot(&format!(
                "topology.logical_locations has {} rows, expected {}",
                ll.len(),
                n
            )));
        }
    }
    if let Some(levels) = &snap.topology.levels {
        if levels.len() != n {
            return Err(invalid_snapshot(&format!(
                "topology.levels has {} entries, expected {}",
                levels.len(),
                n
            )));
        }
    }
    for (group, arrays) in [
        ("locations", &snap.topology.locations),
        ("volume_locations", &snap.topology.volume_locations),
    ] {
        for (key, rows) in arrays {
            check_rows(&format!("topology.{}.{}", group, key), rows, n, None)?;
        }
    }

    // Fields
    let cells = n * nz * ny * nx;
    for (name, field) in &snap.fields {
        let components = field.components.unwrap_or(1);
        if components == 0 {
            return Err(invalid_snapshot(&format!(
                "field {} declares zero components",
                name
            )));
        }
        if field.data.len() != cells * components {
            return Err(invalid_snapshot(&format!(
                "field {} has {} values, expected {} ({} cells x {} components)",
                name,
                field.data.len(),
                cells * components,
                cells,
                components
            )));
        }
    }

    Ok(())
}

/// Rows must number `n` and share one length (`width` when given).
fn check_rows(what: &str, rows: &[Vec<f64>], n: usize, width: Option<usize>) -> Result<()> {
    if rows.len() != n {
        return Err(invalid_snapshot(&format!(
            "{} has {} rows, expected {}",
            what,
            rows.len(),
            n
        )));
    }
    let expected = width.or_else(|| rows.first().map(Vec::len)).unwrap_or(0);
    if let Some((b, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(invalid_snapshot(&format!(
            "{} row {} has {} values, expected {}",
            what,
            b,
            row.len(),
            expected
        )));
    }
    Ok(())
}

/// Convert a validated snapshot into a dataset labelled `label`.
///
/// The time falls back to `info.Time` and then to zero.
pub fn into_dataset(label: &str, snap: SnapshotV1) -> Result<Dataset> {
    let with_label = |e: blockdiff_core::ExError| e.with_path(label.to_string());

    let coordinates = BlockCoordinates {
        x: rows_to_array("coordinates.x", &snap.coordinates.x).map_err(with_label)?,
        y: rows_to_array("coordinates.y", &snap.coordinates.y).map_err(with_label)?,
        z: rows_to_array("coordinates.z", &snap.coordinates.z).map_err(with_label)?,
    };
    let topology = convert_topology(&snap.topology).map_err(with_label)?;

    let time = snap
        .time
        .or_else(|| snap.info.get("Time").and_then(|t| t.as_f64()))
        .unwrap_or(0.0);

    let mut ds = Dataset::new(label, coordinates)?.with_time(time);
    if let Some(real) = snap.total_cells_real {
        ds = ds.with_total_cells_real(real);
    }
    ds.info = snap.info;
    ds.params = snap.params;
    ds = ds.with_topology(topology)?;

    let [nz, ny, nx] = snap.block_shape;
    for (name, field) in snap.fields {
        let mut shape = vec![snap.num_blocks, nz, ny, nx];
        if let Some(c) = field.components {
            shape.push(c);
        }
        let data = ArrayD::from_shape_vec(IxDyn(&shape), field.data).map_err(|e| {
            invalid_snapshot(&format!("field {}: {}", name, e)).with_path(label.to_string())
        })?;
        ds = ds.with_field(name, data)?;
    }

    Ok(ds)
}

fn rows_to_array(what: &str, rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| invalid_snapshot(&format!("{}: {}", what, e)))
}

fn convert_topology(topo: &SnapshotTopology) -> Result<BlockTopology> {
    let logical_locations = match &topo.logical_locations {
        Some(ll) => {
            let flat: Vec<i64> = ll.iter().flatten().copied().collect();
            Some(
                Array2::from_shape_vec((ll.len(), 3), flat)
                    .map_err(|e| invalid_snapshot(&format!("topology.logical_locations: {}", e)))?,
            )
        }
        None => None,
    };

    let convert_group = |group: &str, arrays: &BTreeMap<String, Vec<Vec<f64>>>| {
        arrays
            .iter()
            .map(|(key, rows)| {
                rows_to_array(&format!("topology.{}.{}", group, key), rows)
                    .map(|arr| (key.clone(), arr))
            })
            .collect::<Result<BTreeMap<_, _>>>()
    };

    Ok(BlockTopology {
        logical_locations,
        levels: topo.levels.clone().map(Array1::from),
        locations: convert_group("locations", &topo.locations)?,
        volume_locations: convert_group("volume_locations", &topo.volume_locations)?,
    })
}
