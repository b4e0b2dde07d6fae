//! blockdiff core - comparison of block-structured AMR snapshots
//!
//! This crate provides:
//! - The in-memory dataset model (fields, coordinates, topology, Info/Params)
//! - Run configuration (`DiffConfig`, `ReportMode`)
//! - Block correspondence resolution between differently ordered files
//! - Metadata and per-field comparison with tolerance
//! - The orchestrating `DiffEngine` and its text report
//! - The structured error and logging facilities shared by the workspace

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod reader;

pub use blockdiff_core_types as types;

// Re-export commonly used types
pub use diff::{DiffEngine, DiffOutcome, DiffStatus};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use model::{AttrValue, Dataset, DiffConfig, ReportMode};
pub use reader::DatasetReader;
