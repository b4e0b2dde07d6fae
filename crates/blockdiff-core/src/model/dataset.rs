//! In-memory snapshot of a block-structured AMR output.

use crate::errors::DiffError;
use crate::model::value::AttrValue;
use ndarray::{Array1, Array2, ArrayD, ArrayView1};
use std::collections::{BTreeMap, HashMap};

/// Info keys that change between otherwise identical runs and are never compared.
pub const VOLATILE_INFO_KEYS: &[&str] = &["Time", "BlocksPerPE"];

/// Names that hold metadata or block topology rather than simulation fields.
pub const RESERVED_NAMES: &[&str] = &[
    "Locations",
    "VolumeLocations",
    "LogicalLocations",
    "Levels",
    "Info",
    "Params",
];

/// Relative closeness used when matching blocks by their coordinate bounds.
const BOUNDS_TOLERANCE: f64 = 1.0e-10;

/// Per-block cell-centre coordinates along each axis.
///
/// Row `b` of `x` holds the `nx` x-coordinates of block `b`; likewise for
/// `y` (`ny` columns) and `z` (`nz` columns).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCoordinates {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

/// Per-block placement of each block in the AMR hierarchy.
///
/// Every entry is optional; writers that do not record a category simply
/// leave it out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockTopology {
    /// `[num_blocks, 3]` integer logical coordinates
    pub logical_locations: Option<Array2<i64>>,
    /// `[num_blocks]` refinement level
    pub levels: Option<Array1<i64>>,
    /// Physical face locations, keyed by axis
    pub locations: BTreeMap<String, Array2<f64>>,
    /// Volumetric locations, keyed by axis
    pub volume_locations: BTreeMap<String, Array2<f64>>,
}

/// Identity of a block in the refinement hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    pub level: i64,
    pub location: [i64; 3],
}

/// One simulation snapshot.
///
/// Immutable once built; a comparison run owns two of these and drops them
/// when it finishes.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub label: String,
    pub time: f64,
    pub num_blocks: usize,
    /// Stored cells per block as `[nz, ny, nx]`
    pub block_shape: [usize; 3],
    pub total_cells: usize,
    pub total_cells_real: usize,
    pub info: BTreeMap<String, AttrValue>,
    pub params: BTreeMap<String, AttrValue>,
    pub fields: BTreeMap<String, ArrayD<f64>>,
    pub coordinates: BlockCoordinates,
    pub topology: BlockTopology,
}

impl Dataset {
    /// Create an empty dataset whose block layout is taken from `coordinates`.
    ///
    /// # Errors
    ///
    /// - `InvalidSnapshot`: the coordinate arrays disagree on the number of blocks
    pub fn new(label: impl Into<String>, coordinates: BlockCoordinates) -> Result<Self, DiffError> {
        let label = label.into();
        let num_blocks = coordinates.x.nrows();
        if coordinates.y.nrows() != num_blocks || coordinates.z.nrows() != num_blocks {
            return Err(DiffError::InvalidSnapshot {
                path: label,
                reason: format!(
                    "coordinate arrays disagree on block count: x={}, y={}, z={}",
                    num_blocks,
                    coordinates.y.nrows(),
                    coordinates.z.nrows()
                ),
            });
        }
        let block_shape = [
            coordinates.z.ncols(),
            coordinates.y.ncols(),
            coordinates.x.ncols(),
        ];
        if block_shape.contains(&0) {
            return Err(DiffError::InvalidSnapshot {
                path: label,
                reason: format!("block shape {:?} has an empty axis", block_shape),
            });
        }
        let total_cells = num_blocks * block_shape.iter().product::<usize>();

        Ok(Self {
            label,
            time: 0.0,
            num_blocks,
            block_shape,
            total_cells,
            total_cells_real: total_cells,
            info: BTreeMap::new(),
            params: BTreeMap::new(),
            fields: BTreeMap::new(),
            coordinates,
            topology: BlockTopology::default(),
        })
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn with_total_cells_real(mut self, total_cells_real: usize) -> Self {
        self.total_cells_real = total_cells_real;
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Attach the block topology after checking its row counts.
    ///
    /// # Errors
    ///
    /// - `InvalidSnapshot`: a topology array has the wrong number of rows or
    ///   logical locations do not have three columns
    pub fn with_topology(mut self, topology: BlockTopology) -> Result<Self, DiffError> {
        let n = self.num_blocks;
        if let Some(ll) = &topology.logical_locations {
            if ll.nrows() != n || ll.ncols() != 3 {
                return Err(self.invalid(format!(
                    "LogicalLocations has shape {:?}, expected [{}, 3]",
                    ll.shape(),
                    n
                )));
            }
        }
        if let Some(levels) = &topology.levels {
            if levels.len() != n {
                return Err(self.invalid(format!(
                    "Levels has {} entries, expected {}",
                    levels.len(),
                    n
                )));
            }
        }
        for (group, arrays) in [
            ("Locations", &topology.locations),
            ("VolumeLocations", &topology.volume_locations),
        ] {
            for (key, arr) in arrays {
                if arr.nrows() != n {
                    return Err(self.invalid(format!(
                        "{}/{} has {} rows, expected {}",
                        group,
                        key,
                        arr.nrows(),
                        n
                    )));
                }
            }
        }
        self.topology = topology;
        Ok(self)
    }

    /// Attach a field array shaped `[num_blocks, nz, ny, nx]` with an optional
    /// trailing component axis.
    ///
    /// # Errors
    ///
    /// - `InvalidSnapshot`: the array's leading axes do not match the block layout
    pub fn with_field(mut self, name: impl Into<String>, data: ArrayD<f64>) -> Result<Self, DiffError> {
        let name = name.into();
        let expected = [
            self.num_blocks,
            self.block_shape[0],
            self.block_shape[1],
            self.block_shape[2],
        ];
        let shape = data.shape();
        let leading_ok = shape.len() >= 4 && shape[..4] == expected;
        if !leading_ok || shape.len() > 5 {
            return Err(self.invalid(format!(
                "field {} has shape {:?}, expected {:?} with an optional component axis",
                name, shape, expected
            )));
        }
        self.fields.insert(name, data);
        Ok(self)
    }

    fn invalid(&self, reason: String) -> DiffError {
        DiffError::InvalidSnapshot {
            path: self.label.clone(),
            reason,
        }
    }

    /// Number of stored cells in one block.
    pub fn cells_per_block(&self) -> usize {
        self.block_shape.iter().product()
    }

    /// A field carries a component axis when it holds more values than the
    /// dataset has cells.
    pub fn is_vector_field(&self, data: &ArrayD<f64>) -> bool {
        data.len() > self.total_cells
    }

    /// Simulation field names, excluding reserved metadata names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|name| !RESERVED_NAMES.contains(name))
    }

    /// Info entries that take part in comparison.
    pub fn comparable_info(&self) -> BTreeMap<&str, &AttrValue> {
        self.info
            .iter()
            .filter(|(k, _)| !VOLATILE_INFO_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Logical identity of a block, when the hierarchy is recorded.
    pub fn logical_key(&self, block: usize) -> Option<LogicalKey> {
        let ll = self.topology.logical_locations.as_ref()?;
        let levels = self.topology.levels.as_ref()?;
        if block >= self.num_blocks {
            return None;
        }
        Some(LogicalKey {
            level: levels[block],
            location: [ll[[block, 0]], ll[[block, 1]], ll[[block, 2]]],
        })
    }

    /// True when both logical locations and levels are recorded.
    pub fn has_logical_topology(&self) -> bool {
        self.topology.logical_locations.is_some() && self.topology.levels.is_some()
    }

    /// Coordinate bounds `[(min, max); 3]` of a block in x, y, z order.
    pub fn block_bounds(&self, block: usize) -> [(f64, f64); 3] {
        fn span(row: ArrayView1<'_, f64>) -> (f64, f64) {
            row.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        }
        [
            span(self.coordinates.x.row(block)),
            span(self.coordinates.y.row(block)),
            span(self.coordinates.z.row(block)),
        ]
    }

    /// Find the block of `other` that occupies the same region as `block`.
    ///
    /// Uses the logical hierarchy when both datasets record it, otherwise the
    /// coordinate bounds. Returns `None` when nothing matches.
    pub fn find_block_idx_in_other(&self, other: &Dataset, block: usize) -> Option<usize> {
        BlockMatcher::new(self, other).find(block)
    }
}

/// Locates blocks of a source dataset in a target dataset.
///
/// Both datasets must record logical topology for blocks to be matched by
/// `(level, logical location)`; otherwise coordinate bounds decide. When
/// several target blocks match, the lowest index wins.
pub struct BlockMatcher<'a> {
    source: &'a Dataset,
    index: TargetIndex,
}

enum TargetIndex {
    Logical(HashMap<LogicalKey, usize>),
    Bounds(Vec<[(f64, f64); 3]>),
}

impl<'a> BlockMatcher<'a> {
    pub fn new(source: &'a Dataset, target: &Dataset) -> Self {
        let index = if source.has_logical_topology() && target.has_logical_topology() {
            let mut keys = HashMap::with_capacity(target.num_blocks);
            for j in 0..target.num_blocks {
                if let Some(key) = target.logical_key(j) {
                    keys.entry(key).or_insert(j);
                }
            }
            TargetIndex::Logical(keys)
        } else {
            TargetIndex::Bounds((0..target.num_blocks).map(|j| target.block_bounds(j)).collect())
        };
        Self { source, index }
    }

    /// Index of the target block matching source block `block`.
    pub fn find(&self, block: usize) -> Option<usize> {
        if block >= self.source.num_blocks {
            return None;
        }
        match &self.index {
            TargetIndex::Logical(keys) => keys.get(&self.source.logical_key(block)?).copied(),
            TargetIndex::Bounds(targets) => {
                let bounds = self.source.block_bounds(block);
                targets.iter().position(|other| bounds_close(&bounds, other))
            }
        }
    }
}

/// Bounds equality up to a relative tolerance.
fn bounds_close(a: &[(f64, f64); 3], b: &[(f64, f64); 3]) -> bool {
    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() <= BOUNDS_TOLERANCE * 1.0_f64.max(x.abs()).max(y.abs())
    }
    a.iter()
        .zip(b.iter())
        .all(|((alo, ahi), (blo, bhi))| close(*alo, *blo) && close(*ahi, *bhi))
}
