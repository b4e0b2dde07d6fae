use blockdiff_core::errors::{DiffError, Result};
use blockdiff_core::model::{BlockCoordinates, BlockTopology};
use blockdiff_core::{Dataset, DatasetReader};
use ndarray::{Array1, Array2, ArrayD, Axis, IxDyn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Build a dataset of `num_blocks` blocks laid side by side along x.
///
/// Each block holds `1 x 2 x 2` cells (`[nz, ny, nx]`), carries logical
/// topology and a `density` field whose value at `(b, k, j, i)` is
/// `1 + 4b + 2j + i`.
#[allow(dead_code)]
pub fn row_of_blocks(label: &str, num_blocks: usize) -> Dataset {
    let x = Array2::from_shape_fn((num_blocks, 2), |(b, i)| b as f64 + 0.25 + 0.5 * i as f64);
    let y = Array2::from_shape_fn((num_blocks, 2), |(_, j)| 0.25 + 0.5 * j as f64);
    let z = Array2::from_elem((num_blocks, 1), 0.5);

    let mut locations = BTreeMap::new();
    locations.insert(
        "x".to_string(),
        Array2::from_shape_fn((num_blocks, 3), |(b, f)| b as f64 + 0.5 * f as f64),
    );
    let topology = BlockTopology {
        logical_locations: Some(Array2::from_shape_fn((num_blocks, 3), |(b, d)| {
            if d == 0 {
                b as i64
            } else {
                0
            }
        })),
        levels: Some(Array1::zeros(num_blocks)),
        locations,
        volume_locations: BTreeMap::new(),
    };

    let density = ArrayD::from_shape_fn(IxDyn(&[num_blocks, 1, 2, 2]), |idx| {
        1.0 + 4.0 * idx[0] as f64 + 2.0 * idx[2] as f64 + idx[3] as f64
    });

    Dataset::new(label, BlockCoordinates { x, y, z })
        .unwrap()
        .with_time(0.25)
        .with_info("NumMeshBlocks", num_blocks as i64)
        .with_info("BlocksPerPE", num_blocks as i64)
        .with_param("hydro/cfl", 0.3)
        .with_param("job/problem_id", "sod")
        .with_topology(topology)
        .unwrap()
        .with_field("density", density)
        .unwrap()
}

/// Return a copy of `ds` whose block `p` is block `perm[p]` of the original.
#[allow(dead_code)]
pub fn permute_blocks(ds: &Dataset, label: &str, perm: &[usize]) -> Dataset {
    let c = &ds.coordinates;
    let coordinates = BlockCoordinates {
        x: c.x.select(Axis(0), perm),
        y: c.y.select(Axis(0), perm),
        z: c.z.select(Axis(0), perm),
    };
    let t = &ds.topology;
    let topology = BlockTopology {
        logical_locations: t.logical_locations.as_ref().map(|a| a.select(Axis(0), perm)),
        levels: t.levels.as_ref().map(|a| a.select(Axis(0), perm)),
        locations: t
            .locations
            .iter()
            .map(|(k, a)| (k.clone(), a.select(Axis(0), perm)))
            .collect(),
        volume_locations: t
            .volume_locations
            .iter()
            .map(|(k, a)| (k.clone(), a.select(Axis(0), perm)))
            .collect(),
    };

    let mut out = Dataset::new(label, coordinates)
        .unwrap()
        .with_time(ds.time)
        .with_total_cells_real(ds.total_cells_real)
        .with_topology(topology)
        .unwrap();
    out.info = ds.info.clone();
    out.params = ds.params.clone();
    for (name, data) in &ds.fields {
        out = out.with_field(name.clone(), data.select(Axis(0), perm)).unwrap();
    }
    out
}

/// Reader over datasets held in memory, keyed by path.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryReader {
    datasets: BTreeMap<PathBuf, Dataset>,
}

#[allow(dead_code)]
impl MemoryReader {
    pub fn with(mut self, path: &str, ds: Dataset) -> Self {
        self.datasets.insert(PathBuf::from(path), ds);
        self
    }
}

impl DatasetReader for MemoryReader {
    fn open(&self, path: &Path) -> Result<Dataset> {
        self.datasets.get(path).cloned().ok_or_else(|| {
            DiffError::SnapshotUnreadable {
                path: path.display().to_string(),
                reason: "no such dataset".to_string(),
            }
            .into()
        })
    }
}

/// Run the engine over two in-memory datasets, returning outcome and report.
#[allow(dead_code)]
pub fn compare(
    config: blockdiff_core::DiffConfig,
    a: &Dataset,
    b: &Dataset,
) -> (blockdiff_core::DiffOutcome, String) {
    let engine = blockdiff_core::DiffEngine::new(MemoryReader::default(), config).unwrap();
    let mut out = Vec::new();
    let outcome = engine.compare(a, b, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}
