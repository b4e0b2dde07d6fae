//! Snapshot documents
//!
//! Provides:
//! - Snapshot Format v1 schema
//! - JSON/YAML parser with validation
//! - Conversion into and out of `Dataset`
//! - `SnapshotReader`

pub mod format_v1;
pub mod parser;
pub mod reader;
pub mod writer;

pub use format_v1::{SnapshotCoordinates, SnapshotField, SnapshotTopology, SnapshotV1};
pub use parser::{into_dataset, parse_snapshot_file, parse_snapshot_str, SnapshotFormat};
pub use reader::SnapshotReader;
pub use writer::{snapshot_to_string, write_snapshot_file};
