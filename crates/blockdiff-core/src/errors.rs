use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// Run configuration rejected before any file is opened
    InvalidConfig,

    // Dataset loading
    /// The file could not be opened or parsed as a snapshot
    Unreadable,
    /// The snapshot parsed but its arrays are inconsistent with its geometry
    InvalidSnapshot,

    // Comparison
    /// A block in the first dataset has no physical counterpart in the second
    UnmatchedBlock,
    /// Two blocks in the first dataset resolve to the same block in the second
    AmbiguousBlockMatch,

    // Integration/IO
    Io,
    /// A dataset could not be encoded as a snapshot
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Unreadable => "ERR_UNREADABLE",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::UnmatchedBlock => "ERR_UNMATCHED_BLOCK",
            ExErrorKind::AmbiguousBlockMatch => "ERR_AMBIGUOUS_BLOCK_MATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional context
/// (operation, file, block, field) for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    block: Option<usize>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            block: None,
            field: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add block index context
    pub fn with_block(mut self, block: usize) -> Self {
        self.block = Some(block);
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the block index context, if any
    pub fn block(&self) -> Option<usize> {
        self.block
    }

    /// Get the field name context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(block) = self.block {
            write!(f, " (block: {})", block)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while loading and comparing datasets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Snapshot file could not be read or decoded
    #[error("Unable to open {path} as a snapshot: {reason}")]
    SnapshotUnreadable { path: String, reason: String },

    /// Snapshot decoded but failed structural validation
    #[error("Invalid snapshot {path}: {reason}")]
    InvalidSnapshot { path: String, reason: String },

    /// No block in the other dataset occupies the same region
    #[error("Block {block} of {dataset} has no matching block in {other}")]
    UnmatchedBlock {
        block: usize,
        dataset: String,
        other: String,
    },

    /// More than one block resolved onto the same counterpart
    #[error("Blocks {first} and {second} both match block {target} of {other}")]
    AmbiguousBlockMatch {
        first: usize,
        second: usize,
        target: usize,
        other: String,
    },

    /// Block counts disagree so no permutation can exist
    #[error("Block counts differ: {a_blocks} vs {b_blocks}")]
    BlockCountMismatch { a_blocks: usize, b_blocks: usize },

    /// Configuration rejected before the run starts
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Conversion from DiffError to ExError
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::SnapshotUnreadable { path, reason } => {
                ExError::new(ExErrorKind::Unreadable)
                    .with_op("open_dataset")
                    .with_path(path)
                    .with_message(reason)
            }

            DiffError::InvalidSnapshot { path, reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_op("open_dataset")
                    .with_path(path)
                    .with_message(reason)
            }

            DiffError::UnmatchedBlock {
                block,
                dataset,
                other,
            } => ExError::new(ExErrorKind::UnmatchedBlock)
                .with_op("resolve_correspondence")
                .with_block(block)
                .with_message(format!(
                    "Block {} of {} has no matching block in {}",
                    block, dataset, other
                )),

            DiffError::AmbiguousBlockMatch {
                first,
                second,
                target,
                other,
            } => ExError::new(ExErrorKind::AmbiguousBlockMatch)
                .with_op("resolve_correspondence")
                .with_block(second)
                .with_message(format!(
                    "Blocks {} and {} both match block {} of {}",
                    first, second, target, other
                )),

            DiffError::BlockCountMismatch { a_blocks, b_blocks } => {
                ExError::new(ExErrorKind::UnmatchedBlock)
                    .with_op("resolve_correspondence")
                    .with_message(format!("Block counts differ: {} vs {}", a_blocks, b_blocks))
            }

            DiffError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("validate_config")
                .with_message(reason),
        }
    }
}

/// Create an IO error for a failed write to the report sink
pub fn report_io_error(err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op("write_report")
        .with_message(err.to_string())
}
