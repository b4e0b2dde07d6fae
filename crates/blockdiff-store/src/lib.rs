//! blockdiff Store - file-backed snapshot loading
//!
//! Provides:
//! - Snapshot document format v1 (JSON or YAML)
//! - Parser with structural validation
//! - Conversion between snapshot documents and in-memory datasets
//! - `SnapshotReader`, the `DatasetReader` used by the command line tool

pub mod errors;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{SnapshotReader, SnapshotV1};
