//! Property tests for block correspondence and field differencing.
//!
//! Datasets come from `common::row_of_blocks` with the density values
//! replaced by generated data.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use blockdiff_core::diff::{compare_field, point_error, BlockCorrespondence, CoordinateGrid};
use blockdiff_core::{Dataset, DiffConfig, DiffStatus, ReportMode};
use common::{compare, permute_blocks, row_of_blocks};
use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────────

fn value() -> impl Strategy<Value = f64> {
    -1.0e3..1.0e3f64
}

/// A block count together with a random permutation of its blocks.
fn permutation() -> impl Strategy<Value = Vec<usize>> {
    (1usize..=6).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

fn scalar_field(num_blocks: usize, values: Vec<f64>) -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(&[num_blocks, 1, 2, 2]), values).unwrap()
}

fn with_density(label: &str, num_blocks: usize, values: Vec<f64>) -> Dataset {
    row_of_blocks(label, num_blocks)
        .with_field("density", scalar_field(num_blocks, values))
        .unwrap()
}

fn density_result(a: &Dataset, b: &Dataset, config: &DiffConfig) -> blockdiff_core::diff::FieldDiffResult {
    let identity = BlockCorrespondence::identity(a.num_blocks);
    let grid = CoordinateGrid::from_dataset(a);
    compare_field("density", a, b, &identity, config, &grid)
}

// ── Properties ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_permutation_is_undone_by_correspondence(
        perm in permutation(),
        seed in prop::collection::vec(value(), 24),
    ) {
        let n = perm.len();
        let a = with_density("a", n, seed[..n * 4].to_vec());
        let b = permute_blocks(&a, "b", &perm);

        let correspondence = BlockCorrespondence::resolve(&a, &b).unwrap();
        for (p, &original) in perm.iter().enumerate() {
            prop_assert_eq!(correspondence.mapping()[original], p);
        }

        let (outcome, _) = compare(DiffConfig::default(), &a, &b);
        prop_assert_eq!(outcome.status, DiffStatus::Equivalent);
        prop_assert!(outcome.fields.iter().all(|f| f.max_error == 0.0));
    }

    #[test]
    fn prop_looser_tolerance_never_adds_differences(
        a_values in prop::collection::vec(value(), 8),
        b_values in prop::collection::vec(value(), 8),
        tol1 in 0.0..10.0f64,
        extra in 0.0..10.0f64,
        relative in any::<bool>(),
    ) {
        let a = with_density("a", 2, a_values);
        let b = with_density("b", 2, b_values);
        let tight = DiffConfig::default().with_tolerance(tol1).with_relative(relative);
        let loose = tight.with_tolerance(tol1 + extra);

        let at_tight = density_result(&a, &b, &tight);
        let at_loose = density_result(&a, &b, &loose);
        if !at_tight.differs {
            prop_assert!(!at_loose.differs);
        }
        prop_assert!(at_loose.offenders.len() <= at_tight.offenders.len());
    }

    #[test]
    fn prop_relative_error_ignores_zero_reference(
        b_value in prop::num::f64::ANY,
        b_values in prop::collection::vec(value(), 8),
    ) {
        prop_assert_eq!(point_error(0.0, b_value, true), 0.0);

        let a = with_density("a", 2, vec![0.0; 8]);
        let b = with_density("b", 2, b_values);
        let config = DiffConfig::default().with_tolerance(0.0).with_relative(true);
        let result = density_result(&a, &b, &config);
        prop_assert_eq!(result.max_error, 0.0);
        prop_assert!(!result.differs);
    }

    #[test]
    fn prop_vector_error_is_component_norm(
        a_values in prop::collection::vec(value(), 24),
        b_values in prop::collection::vec(value(), 24),
    ) {
        let shape = IxDyn(&[2, 1, 2, 2, 3]);
        let va = ArrayD::from_shape_vec(shape.clone(), a_values).unwrap();
        let vb = ArrayD::from_shape_vec(shape, b_values).unwrap();
        let a = row_of_blocks("a", 2).with_field("velocity", va.clone()).unwrap();
        let b = row_of_blocks("b", 2).with_field("velocity", vb.clone()).unwrap();

        let config = DiffConfig::default().with_tolerance(0.0).with_report(ReportMode::All);
        let identity = BlockCorrespondence::identity(2);
        let grid = CoordinateGrid::from_dataset(&a);
        let result = compare_field("velocity", &a, &b, &identity, &config, &grid);

        prop_assert!(result.is_vector);
        let mut expected_max = 0.0_f64;
        for o in &result.offenders {
            let [k, j, i] = o.index;
            let mut sum = 0.0;
            for c in 0..3 {
                let e = (va[IxDyn(&[o.block, k, j, i, c])] - vb[IxDyn(&[o.block, k, j, i, c])]).abs();
                prop_assert_eq!(o.component_errors[c], e);
                sum += e * e;
            }
            let norm = sum.sqrt();
            prop_assert!((o.error - norm).abs() <= 1.0e-12 * norm.max(1.0));
            expected_max = expected_max.max(norm);
        }
        prop_assert!((result.max_error - expected_max).abs() <= 1.0e-12 * expected_max.max(1.0));
    }
}
