//! Run configuration passed explicitly to the engine and every comparator.

use crate::errors::DiffError;
use serde::{Deserialize, Serialize};

/// Default absolute tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-12;

/// How much the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Every differing field, every offending point
    #[default]
    All,
    /// Worst point of the first differing field, then stop
    One,
    /// Only whether the files differ
    Brief,
    /// Brief, with all non-error output suppressed except the differ line
    Quiet,
}

impl ReportMode {
    /// Resolve command-line style flags. Quiet beats brief, brief beats
    /// one and all, one beats all.
    pub fn from_flags(all: bool, one: bool, brief: bool, quiet: bool) -> Self {
        match (quiet, brief, one, all) {
            (true, _, _, _) => ReportMode::Quiet,
            (false, true, _, _) => ReportMode::Brief,
            (false, false, true, _) => ReportMode::One,
            (false, false, false, _) => ReportMode::All,
        }
    }

    /// Whether offending points and per-category summary lines are reported.
    pub fn is_verbose(self) -> bool {
        matches!(self, ReportMode::All | ReportMode::One)
    }

    pub fn stops_at_first_difference(self) -> bool {
        self == ReportMode::One
    }
}

/// Configuration of one comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Absolute (or relative, see `relative`) tolerance
    pub tolerance: f64,
    /// Run the metadata check before comparing fields
    pub check_metadata: bool,
    /// Use `|a - b| / |a|` instead of `|a - b|`
    pub relative: bool,
    pub report: ReportMode,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            check_metadata: true,
            relative: false,
            report: ReportMode::All,
        }
    }
}

impl DiffConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_check_metadata(mut self, check_metadata: bool) -> Self {
        self.check_metadata = check_metadata;
        self
    }

    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_report(mut self, report: ReportMode) -> Self {
        self.report = report;
        self
    }

    /// Reject configurations no comparison can honour.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: tolerance is negative, NaN or infinite
    pub fn validate(&self) -> Result<(), DiffError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(DiffError::InvalidConfig {
                reason: format!(
                    "tolerance must be finite and non-negative, got {}",
                    self.tolerance
                ),
            });
        }
        Ok(())
    }
}
