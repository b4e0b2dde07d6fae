//! Snapshot Format v1 schema
//!
//! Defines the JSON/YAML structure of one simulation output. Multi-dimensional
//! arrays are stored as nested lists (one row per block) or, for fields, as a
//! flat row-major list ordered `(block, k, j, i[, component])`.

use blockdiff_core::model::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level snapshot document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Simulation time; falls back to `info.Time` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    /// Stored cells per block as `[nz, ny, nx]`
    pub block_shape: [usize; 3],

    pub num_blocks: usize,

    /// Cells excluding ghost/duplicate cells; defaults to the stored count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cells_real: Option<usize>,

    #[serde(default)]
    pub info: BTreeMap<String, AttrValue>,

    #[serde(default)]
    pub params: BTreeMap<String, AttrValue>,

    pub coordinates: SnapshotCoordinates,

    #[serde(default)]
    pub topology: SnapshotTopology,

    #[serde(default)]
    pub fields: BTreeMap<String, SnapshotField>,
}

/// Per-block cell-centre coordinates, one row per block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCoordinates {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
}

/// Block placement in the refinement hierarchy; every entry optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTopology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_locations: Option<Vec<[i64; 3]>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<i64>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volume_locations: BTreeMap<String, Vec<Vec<f64>>>,
}

/// One simulation field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotField {
    /// Length of the trailing component axis; absent for scalar fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<usize>,

    /// Flat row-major values
    pub data: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{
            "schema_version": 1,
            "block_shape": [1, 1, 2],
            "num_blocks": 1,
            "coordinates": {"x": [[0.25, 0.75]], "y": [[0.5]], "z": [[0.5]]}
        }"#;
        let snap: SnapshotV1 = serde_json::from_str(json).unwrap();
        assert_eq!(snap.time, None);
        assert!(snap.info.is_empty());
        assert!(snap.fields.is_empty());
        assert_eq!(snap.topology, SnapshotTopology::default());
    }

    #[test]
    fn test_params_keep_their_tags() {
        let yaml = r#"
schema_version: 1
block_shape: [1, 1, 1]
num_blocks: 1
params:
  hydro/cfl: 0.3
  hydro/nghost: 2
  job/problem_id: sod
coordinates: {x: [[0.5]], y: [[0.5]], z: [[0.5]]}
"#;
        let snap: SnapshotV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snap.params["hydro/cfl"], AttrValue::Float(0.3));
        assert_eq!(snap.params["hydro/nghost"], AttrValue::Int(2));
        assert_eq!(snap.params["job/problem_id"], AttrValue::from("sod"));
    }
}
