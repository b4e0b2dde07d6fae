//! Snapshot comparison engine.
//!
//! Compares two AMR datasets and produces a structured, deterministic
//! outcome plus a human-readable report.
//!
//! ## Entry point
//!
//! ```ignore
//! use blockdiff_core::diff::DiffEngine;
//!
//! let engine = DiffEngine::new(reader, DiffConfig::default())?;
//! let outcome = engine.run(path_a, path_b, &mut std::io::stdout())?;
//! std::process::exit(outcome.status.code());
//! ```
//!
//! ## Guarantees
//!
//! - **Order independence**: blocks are matched by physical identity, never by
//!   storage position.
//! - **Determinism**: fields are visited in sorted order and offenders in
//!   row-major order.
//! - **Verbosity never changes the verdict**: the report mode only controls
//!   what is written and how many offenders are collected.

pub mod correspondence;
pub mod engine;
pub mod field;
pub mod metadata;
pub mod model;
pub mod report;

pub use correspondence::BlockCorrespondence;
pub use engine::DiffEngine;
pub use field::{compare_field, point_error, CoordinateGrid};
pub use metadata::{compare_attributes, compare_topology};
pub use model::{
    DiffOutcome, DiffStatus, FieldDiffResult, FieldPresence, MetadataCategory,
    MetadataComparison, MetadataDetail, MetadataFinding, Offender,
};
pub use report::ReportWriter;

/// Tolerance check shared by the comparators. NaN always exceeds.
pub(crate) fn exceeds(error: f64, tol: f64) -> bool {
    error.is_nan() || error > tol
}
