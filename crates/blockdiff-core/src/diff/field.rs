//! Per-field numeric differencing.

use crate::diff::correspondence::BlockCorrespondence;
use crate::diff::exceeds;
use crate::diff::model::{FieldDiffResult, FieldPresence, Offender};
use crate::model::config::{DiffConfig, ReportMode};
use crate::model::dataset::Dataset;
use crate::{log_op_end, log_op_start};
use ndarray::{Array5, ArrayD, Axis, IxDyn, Zip};
use std::time::Instant;

/// Cell-centre coordinates of every cell of a dataset, laid out
/// `[block, k, j, i, (z, y, x)]`.
///
/// Built once per run from dataset A and used to locate offenders.
#[derive(Debug, Clone)]
pub struct CoordinateGrid {
    points: Array5<f64>,
}

impl CoordinateGrid {
    pub fn from_dataset(ds: &Dataset) -> Self {
        let [nz, ny, nx] = ds.block_shape;
        let c = &ds.coordinates;
        let points = Array5::from_shape_fn((ds.num_blocks, nz, ny, nx, 3), |(b, k, j, i, d)| {
            match d {
                0 => c.z[[b, k]],
                1 => c.y[[b, j]],
                _ => c.x[[b, i]],
            }
        });
        Self { points }
    }

    /// `[z, y, x]` of cell `(k, j, i)` in `block`.
    pub fn point(&self, block: usize, k: usize, j: usize, i: usize) -> [f64; 3] {
        let p = &self.points;
        [
            p[[block, k, j, i, 0]],
            p[[block, k, j, i, 1]],
            p[[block, k, j, i, 2]],
        ]
    }
}

/// Error between one value of A and the matching value of B.
///
/// Relative errors use A as the reference; where A is zero the point does
/// not contribute, whatever B holds. Otherwise a NaN on exactly one side
/// never compares equal.
pub fn point_error(a: f64, b: f64, relative: bool) -> f64 {
    if relative && a == 0.0 {
        return 0.0;
    }
    match (a.is_nan(), b.is_nan()) {
        (true, true) => 0.0,
        (true, false) | (false, true) => f64::INFINITY,
        (false, false) if relative => ((a - b) / a).abs(),
        (false, false) => (a - b).abs(),
    }
}

/// Compare one field of A against the same field of B.
///
/// B's blocks are reordered through `correspondence` before differencing.
/// Vector fields reduce to the Euclidean norm of their component errors.
/// Offenders are collected only when `config.report` is verbose: the single
/// worst point in `One` mode, every point over tolerance in `All` mode.
pub fn compare_field(
    name: &str,
    a: &Dataset,
    b: &Dataset,
    correspondence: &BlockCorrespondence,
    config: &DiffConfig,
    grid: &CoordinateGrid,
) -> FieldDiffResult {
    let start = Instant::now();
    log_op_start!("compare_field", field = name);

    let result = match (a.fields.get(name), b.fields.get(name)) {
        (Some(va), Some(vb)) if va.shape() == vb.shape() => {
            compare_arrays(name, a, va, vb, correspondence, config, grid)
        }
        (Some(va), Some(_)) => unusable(name, a.is_vector_field(va), FieldPresence::Both, true),
        (Some(va), None) => unusable(name, a.is_vector_field(va), FieldPresence::OnlyInA, false),
        (None, Some(vb)) => unusable(name, b.is_vector_field(vb), FieldPresence::OnlyInB, false),
        (None, None) => unusable(name, false, FieldPresence::Both, false),
    };

    let status = if result.differs { "differs" } else { "no_diffs" };
    log_op_end!(
        "compare_field",
        duration_ms = start.elapsed().as_millis() as u64,
        field = name,
        status = status,
        num_offenders = result.offenders.len()
    );
    result
}

fn unusable(name: &str, is_vector: bool, presence: FieldPresence, shape_mismatch: bool) -> FieldDiffResult {
    FieldDiffResult {
        name: name.to_string(),
        differs: true,
        max_error: f64::INFINITY,
        is_vector,
        presence,
        shape_mismatch,
        offenders: Vec::new(),
    }
}

fn compare_arrays(
    name: &str,
    a: &Dataset,
    va: &ArrayD<f64>,
    vb: &ArrayD<f64>,
    correspondence: &BlockCorrespondence,
    config: &DiffConfig,
    grid: &CoordinateGrid,
) -> FieldDiffResult {
    let is_vector = a.is_vector_field(va);
    let has_components = va.ndim() == 5;
    let vb = correspondence.reorder(vb);

    let err = Zip::from(va)
        .and(&vb)
        .map_collect(|&x, &y| point_error(x, y, config.relative));

    let magnitude = if has_components {
        err.map_axis(Axis(4), |lane| lane.iter().map(|e| e * e).sum::<f64>().sqrt())
    } else {
        err.clone()
    };

    let max_error = magnitude
        .iter()
        .fold(0.0_f64, |m, &e| if e.is_nan() || e > m { e } else { m });
    let differs = exceeds(max_error, config.tolerance);

    let mut offenders = Vec::new();
    if differs && config.report.is_verbose() {
        let points: Vec<IxDyn> = if config.report == ReportMode::One {
            worst_point(&magnitude).into_iter().collect()
        } else {
            magnitude
                .indexed_iter()
                .filter(|(_, e)| exceeds(**e, config.tolerance))
                .map(|(idx, _)| idx)
                .collect()
        };

        let ncomp = if has_components { va.shape()[4] } else { 1 };
        for idx in points {
            let (block, k, j, i) = (idx[0], idx[1], idx[2], idx[3]);
            let at = |arr: &ArrayD<f64>, c: usize| {
                if has_components {
                    arr[IxDyn(&[block, k, j, i, c])]
                } else {
                    arr[IxDyn(&[block, k, j, i])]
                }
            };
            offenders.push(Offender {
                block,
                index: [k, j, i],
                coord: grid.point(block, k, j, i),
                a_values: (0..ncomp).map(|c| at(va, c)).collect(),
                b_values: (0..ncomp).map(|c| at(&vb, c)).collect(),
                component_errors: if is_vector {
                    (0..ncomp).map(|c| at(&err, c)).collect()
                } else {
                    Vec::new()
                },
                error: magnitude[idx.clone()],
            });
        }
    }

    if differs {
        tracing::debug!(field = name, max_error, "field exceeds tolerance");
    }

    FieldDiffResult {
        name: name.to_string(),
        differs,
        max_error,
        is_vector,
        presence: FieldPresence::Both,
        shape_mismatch: false,
        offenders,
    }
}

/// Index of the first largest element in row-major order.
fn worst_point(magnitude: &ArrayD<f64>) -> Option<IxDyn> {
    let mut best: Option<(IxDyn, f64)> = None;
    for (idx, &e) in magnitude.indexed_iter() {
        let better = match &best {
            None => true,
            Some((_, m)) => e > *m || (e.is_nan() && !m.is_nan()),
        };
        if better {
            best = Some((idx, e));
        }
    }
    best.map(|(idx, _)| idx)
}
