//! Error handling for blockdiff-store
//!
//! Wraps blockdiff-core ExError with store-specific helpers

use blockdiff_core::errors::{DiffError, ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an error for a file that could not be decoded
pub fn unreadable(path: &Path, reason: &str) -> ExError {
    DiffError::SnapshotUnreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Create an error for content that is not a well-formed document
pub fn parse_error(reason: &str) -> ExError {
    ExError::new(ExErrorKind::Unreadable)
        .with_op("snapshot_parse")
        .with_message(reason.to_string())
}

/// Create a snapshot validation error
pub fn invalid_snapshot(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("snapshot_validate")
        .with_message(reason.to_string())
}

/// Create an error for a file that could not be read at all
pub fn io_error(path: &Path, operation: &str, err: std::io::Error) -> ExError {
    let cause = ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string());
    unreadable(path, &err.to_string()).with_source(cause)
}

/// Create a serialization error for the snapshot writer
pub fn serialization(reason: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("snapshot_write")
        .with_message(reason.to_string())
}
