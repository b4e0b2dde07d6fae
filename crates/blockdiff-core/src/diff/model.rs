//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, PartialEq`. Collections are
//! ordered (`Vec` in evaluation order, `BTreeSet`-sorted key lists) so the
//! structured result of a run is deterministic.

use serde::{Deserialize, Serialize};

/// Verdict of a comparison run, with stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffStatus {
    /// Equivalent within tolerance
    Equivalent,
    /// First file could not be opened
    FirstUnreadable,
    /// Second file could not be opened
    SecondUnreadable,
    /// Total real cell counts differ
    CellCountMismatch,
    /// At least one field differs beyond tolerance
    FieldsDiffer,
    TimeMismatch,
    InfoKeysMismatch,
    InfoValuesMismatch,
    ParamsKeysMismatch,
    /// Float or non-float params differ
    ParamsValuesMismatch,
    /// Topology arrays differ, or no block correspondence exists
    TopologyMismatch,
}

impl DiffStatus {
    /// Stable exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            DiffStatus::Equivalent => 0,
            DiffStatus::FirstUnreadable => 1,
            DiffStatus::SecondUnreadable => 2,
            DiffStatus::CellCountMismatch => 3,
            DiffStatus::FieldsDiffer => 4,
            DiffStatus::TimeMismatch => 10,
            DiffStatus::InfoKeysMismatch => 11,
            DiffStatus::InfoValuesMismatch => 12,
            DiffStatus::ParamsKeysMismatch => 13,
            DiffStatus::ParamsValuesMismatch => 14,
            DiffStatus::TopologyMismatch => 15,
        }
    }

    pub fn is_equivalent(self) -> bool {
        self == DiffStatus::Equivalent
    }
}

/// Which metadata category a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataCategory {
    Time,
    InfoKeys,
    InfoValues,
    ParamsKeys,
    ParamsValues,
    /// A topology variable, e.g. `Locations/x` or `Levels`
    Topology,
}

/// What a metadata category check found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataDetail {
    /// Category matched
    NoDiffs,
    /// `a.time - b.time`
    TimeDelta(f64),
    /// Key-set difference
    Keys {
        only_in_a: Vec<String>,
        only_in_b: Vec<String>,
    },
    /// Keys whose values compare unequal
    Values(Vec<String>),
    /// Params split by how they were compared
    Params {
        non_float: Vec<String>,
        float_deltas: Vec<(String, f64)>,
    },
    /// Topology variable differs; `error` is the norm for float arrays
    Topology { error: Option<f64> },
}

/// One metadata check result, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFinding {
    pub category: MetadataCategory,
    /// Display name: `Info`, `Params`, `Locations/x`, `Levels`, ...
    pub name: String,
    pub detail: MetadataDetail,
}

impl MetadataFinding {
    pub fn differs(&self) -> bool {
        self.detail != MetadataDetail::NoDiffs
    }
}

/// Result of the metadata pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataComparison {
    pub status: DiffStatus,
    pub findings: Vec<MetadataFinding>,
}

/// Where a field was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPresence {
    Both,
    OnlyInA,
    OnlyInB,
}

/// A single point whose error exceeds tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offender {
    /// Block index in dataset A's order
    pub block: usize,
    /// Local cell index `[k, j, i]`
    pub index: [usize; 3],
    /// Cell-centre coordinate `[z, y, x]` from dataset A
    pub coord: [f64; 3],
    /// Values from A (one per component)
    pub a_values: Vec<f64>,
    /// Values from B after block reordering
    pub b_values: Vec<f64>,
    /// Per-component errors; empty for scalar fields
    pub component_errors: Vec<f64>,
    /// Reduced error magnitude at this point
    pub error: f64,
}

/// Outcome of comparing one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiffResult {
    pub name: String,
    pub differs: bool,
    pub max_error: f64,
    pub is_vector: bool,
    pub presence: FieldPresence,
    pub shape_mismatch: bool,
    /// Offending points, empty when reporting is suppressed
    pub offenders: Vec<Offender>,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffOutcome {
    pub status: DiffStatus,
    /// `None` when the metadata check was skipped or never reached
    pub metadata: Option<MetadataComparison>,
    pub fields: Vec<FieldDiffResult>,
    /// `None` when the run stopped before blocks were resolved
    pub correspondence: Option<Vec<usize>>,
}

impl DiffOutcome {
    pub(crate) fn stopped(status: DiffStatus) -> Self {
        Self {
            status,
            metadata: None,
            fields: Vec::new(),
            correspondence: None,
        }
    }

    /// Fields that differ, in comparison order.
    pub fn differing_fields(&self) -> impl Iterator<Item = &FieldDiffResult> {
        self.fields.iter().filter(|f| f.differs)
    }
}
