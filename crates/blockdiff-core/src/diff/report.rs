//! Human-readable report renderer.
//!
//! The only part of the engine that writes to the output sink. What gets
//! written depends on the [`ReportMode`]:
//!
//! - `All` / `One`: dataset summaries, metadata findings, offenders, per-field
//!   summary lines and the verdict
//! - `Brief`: the verdict line only
//! - `Quiet`: a single line when the files differ, nothing otherwise
//!
//! Error lines for unreadable files are written in every mode.

use crate::diff::model::{
    DiffStatus, FieldDiffResult, FieldPresence, MetadataComparison, MetadataDetail, Offender,
};
use crate::errors::{report_io_error, Result};
use crate::model::config::ReportMode;
use crate::model::dataset::Dataset;
use std::io::Write;

/// Writes report lines to a sink according to a [`ReportMode`].
pub struct ReportWriter<'a> {
    out: &'a mut dyn Write,
    mode: ReportMode,
}

impl<'a> ReportWriter<'a> {
    pub fn new(out: &'a mut dyn Write, mode: ReportMode) -> Self {
        Self { out, mode }
    }

    fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref()).map_err(report_io_error)
    }

    /// Written in every mode.
    pub fn open_error(&mut self, path: &str, reason: &str) -> Result<()> {
        self.line(format!("*** ERROR: Unable to open {} as a snapshot file", path))?;
        self.line(format!("    {}", reason))
    }

    pub fn dataset(&mut self, ds: &Dataset) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        let [nz, ny, nx] = ds.block_shape;
        self.line(format!("{}:", ds.label))?;
        self.line(format!("  {:>20}: {}", "Time", ds.time))?;
        self.line(format!("  {:>20}: {}", "NumBlocks", ds.num_blocks))?;
        self.line(format!("  {:>20}: {} x {} x {}", "BlockShape", nz, ny, nx))?;
        self.line(format!("  {:>20}: {}", "TotalCellsReal", ds.total_cells_real))?;
        self.line(format!(
            "  {:>20}: {}",
            "Fields",
            ds.field_names().collect::<Vec<_>>().join(", ")
        ))
    }

    pub fn cell_count_mismatch(&mut self, a: &Dataset, b: &Dataset) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        self.line("These simulations have different number of cells.")?;
        self.line(format!(
            "    {}: {}, {}: {}",
            a.label, a.total_cells_real, b.label, b.total_cells_real
        ))?;
        self.line("Clearly they are different.")
    }

    pub fn unresolved_blocks(&mut self, reason: &str) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        self.line(format!("Block correspondence could not be resolved: {}", reason))
    }

    pub fn metadata_banner(&mut self, checking: bool) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        self.line(if checking {
            "Checking metadata"
        } else {
            "Ignoring metadata"
        })
    }

    pub fn metadata(&mut self, comparison: &MetadataComparison, a: &str, b: &str) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        for finding in &comparison.findings {
            match &finding.detail {
                MetadataDetail::NoDiffs => {
                    self.line(format!("  {:>20}: no diffs", finding.name))?;
                }
                MetadataDetail::TimeDelta(delta) => {
                    self.line(format!("Time of outputs differ by {}", delta))?;
                }
                MetadataDetail::Keys {
                    only_in_a,
                    only_in_b,
                } => {
                    self.line(format!("Names of attributes in '/{}' differ", finding.name))?;
                    if !only_in_a.is_empty() {
                        self.line(format!("    only in {}: {}", a, only_in_a.join(", ")))?;
                    }
                    if !only_in_b.is_empty() {
                        self.line(format!("    only in {}: {}", b, only_in_b.join(", ")))?;
                    }
                }
                MetadataDetail::Values(keys) => {
                    self.line(format!("Values of attributes in '/{}' differ", finding.name))?;
                    self.line(format!("Differing attributes: {}", keys.join(", ")))?;
                }
                MetadataDetail::Params {
                    non_float,
                    float_deltas,
                } => {
                    if !non_float.is_empty() {
                        self.line("Values of non-float attributes in '/Params' differ")?;
                        self.line(format!("Differing attributes: {}", non_float.join(", ")))?;
                    }
                    if !float_deltas.is_empty() {
                        self.line("Values of float attributes in '/Params' differ")?;
                        for (key, delta) in float_deltas {
                            self.line(format!("Param {} differs by {}", key, delta))?;
                        }
                    }
                }
                MetadataDetail::Topology { error } => {
                    let suffix = error.map(|e| format!(" (norm {:e})", e)).unwrap_or_default();
                    self.line(format!(
                        "Metavariable {} differs between {} and {}{}",
                        finding.name, a, b, suffix
                    ))?;
                }
            }
        }
        Ok(())
    }

    pub fn field_banner(&mut self, tolerance: f64) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        self.line(format!(
            "____Comparing on a per variable basis with tolerance {:.16e}",
            tolerance
        ))
    }

    pub fn field(&mut self, result: &FieldDiffResult, a: &str, b: &str) -> Result<()> {
        if !self.mode.is_verbose() {
            return Ok(());
        }
        for offender in &result.offenders {
            self.offender(&result.name, result.is_vector, offender)?;
        }
        let reason = match (result.presence, result.shape_mismatch) {
            (FieldPresence::OnlyInA, _) => format!(" (only in {})", a),
            (FieldPresence::OnlyInB, _) => format!(" (only in {})", b),
            (FieldPresence::Both, true) => " (shapes differ)".to_string(),
            (FieldPresence::Both, false) => String::new(),
        };
        let verdict = if result.differs { "differs" } else { "no diffs" };
        self.line(format!("  {:<20}: {}{}", result.name, verdict, reason))
    }

    fn offender(&mut self, name: &str, is_vector: bool, o: &Offender) -> Result<()> {
        fn values(vs: &[f64]) -> String {
            vs.iter()
                .map(|v| format!("{:.4e}", v))
                .collect::<Vec<_>>()
                .join(" ")
        }

        let [k, j, i] = o.index;
        let [z, y, x] = o.coord;
        self.line(format!("Diff in {}", name))?;
        self.line(format!("    bkji: ({:4},{:4},{:4},{:4})", o.block, k, j, i))?;
        self.line(format!("    zyx: ({:.6},{:.6},{:.6})", z, y, x))?;
        self.line(format!("    err_mag: {:.6e}", o.error))?;
        self.line(format!("    f0: {}", values(&o.a_values)))?;
        self.line(format!("    f1: {}", values(&o.b_values)))?;
        if is_vector {
            self.line(format!("    err: {}", values(&o.component_errors)))?;
        }
        Ok(())
    }

    /// Closing line. Unreadable files already produced their error line.
    pub fn verdict(&mut self, status: DiffStatus, a: &str, b: &str) -> Result<()> {
        if matches!(
            status,
            DiffStatus::FirstUnreadable | DiffStatus::SecondUnreadable
        ) {
            return Ok(());
        }
        match (status.is_equivalent(), self.mode) {
            (true, ReportMode::Quiet) => Ok(()),
            (true, _) => self.line(format!("{} and {} are equivalent", a, b)),
            (false, _) => self.line(format!(
                "{} and {} differ (status {})",
                a,
                b,
                status.code()
            )),
        }
    }
}
