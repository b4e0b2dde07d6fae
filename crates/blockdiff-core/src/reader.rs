//! Dataset loading seam.
//!
//! The engine never touches files directly; it asks a [`DatasetReader`] for
//! each input. `blockdiff-store` provides the file-backed implementation.

use crate::errors::Result;
use crate::model::dataset::Dataset;
use std::path::Path;

/// Loads one snapshot into memory.
pub trait DatasetReader {
    /// Open and fully load the dataset at `path`.
    ///
    /// # Errors
    ///
    /// - `Unreadable`: the file cannot be read or decoded
    /// - `InvalidSnapshot`: the contents are inconsistent with the block layout
    fn open(&self, path: &Path) -> Result<Dataset>;
}

impl<R: DatasetReader + ?Sized> DatasetReader for &R {
    fn open(&self, path: &Path) -> Result<Dataset> {
        (**self).open(path)
    }
}
