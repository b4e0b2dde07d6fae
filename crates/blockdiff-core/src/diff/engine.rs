//! Comparison orchestrator.
//!
//! A run is a linear sequence with early exit on the first hard failure:
//! open both files, check cell counts, check time, Info and Params, resolve
//! the block correspondence and check topology, then compare every field.
//! With metadata ignored the correspondence is resolved right before the
//! fields; an unresolved correspondence is a topology mismatch either way.

#![allow(clippy::result_large_err)]

use crate::diff::correspondence::BlockCorrespondence;
use crate::diff::field::{compare_field, CoordinateGrid};
use crate::diff::metadata::{compare_attributes, compare_topology};
use crate::diff::model::{DiffOutcome, DiffStatus, MetadataComparison};
use crate::diff::report::ReportWriter;
use crate::errors::{ExError, Result};
use crate::model::config::DiffConfig;
use crate::model::dataset::Dataset;
use crate::reader::DatasetReader;
use crate::types::RunId;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Drives one comparison per call to [`DiffEngine::run`] or
/// [`DiffEngine::compare`].
///
/// Report text goes to the sink passed in; diagnostics go through `tracing`.
/// Only sink write failures surface as `Err`; every comparison outcome,
/// including unreadable inputs, is a [`DiffStatus`].
pub struct DiffEngine<R> {
    reader: R,
    config: DiffConfig,
}

impl<R: DatasetReader> DiffEngine<R> {
    /// # Errors
    ///
    /// - `InvalidConfig`: the configuration fails validation
    pub fn new(reader: R, config: DiffConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { reader, config })
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Open both files through the reader and compare them.
    ///
    /// # Errors
    ///
    /// - `Io`: writing the report failed
    pub fn run(&self, path_a: &Path, path_b: &Path, out: &mut dyn Write) -> Result<DiffOutcome> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("diff_run", run_id = %run_id);

        let mut report = ReportWriter::new(out, self.config.report);
        let label_a = path_a.display().to_string();
        let label_b = path_b.display().to_string();

        let a = match self.open(path_a, &mut report)? {
            Some(ds) => ds,
            None => return self.finish(&run_id, start, DiffOutcome::stopped(DiffStatus::FirstUnreadable)),
        };
        let b = match self.open(path_b, &mut report)? {
            Some(ds) => ds,
            None => return self.finish(&run_id, start, DiffOutcome::stopped(DiffStatus::SecondUnreadable)),
        };

        let outcome = self.execute(&a, &b, &mut report)?;
        report.verdict(outcome.status, &label_a, &label_b)?;
        self.finish(&run_id, start, outcome)
    }

    /// Compare two datasets that are already in memory.
    ///
    /// # Errors
    ///
    /// - `Io`: writing the report failed
    pub fn compare(&self, a: &Dataset, b: &Dataset, out: &mut dyn Write) -> Result<DiffOutcome> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("diff_run", run_id = %run_id);

        let mut report = ReportWriter::new(out, self.config.report);
        report.dataset(a)?;
        report.dataset(b)?;
        let outcome = self.execute(a, b, &mut report)?;
        report.verdict(outcome.status, &a.label, &b.label)?;
        self.finish(&run_id, start, outcome)
    }

    fn finish(&self, run_id: &RunId, start: Instant, outcome: DiffOutcome) -> Result<DiffOutcome> {
        log_op_end!(
            "diff_run",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id,
            status = outcome.status.code(),
            num_fields = outcome.fields.len()
        );
        Ok(outcome)
    }

    /// `Ok(None)` when the file could not be loaded; the error line has
    /// been written.
    fn open(&self, path: &Path, report: &mut ReportWriter<'_>) -> Result<Option<Dataset>> {
        let start = Instant::now();
        let file = path.display().to_string();
        log_op_start!("open_dataset", file = file.as_str());

        match self.reader.open(path) {
            Ok(ds) => {
                log_op_end!(
                    "open_dataset",
                    duration_ms = start.elapsed().as_millis() as u64,
                    file = file.as_str(),
                    num_blocks = ds.num_blocks,
                    num_fields = ds.fields.len()
                );
                report.dataset(&ds)?;
                Ok(Some(ds))
            }
            Err(err) => {
                let reason = describe(&err);
                log_op_error!(
                    "open_dataset",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    file = file.as_str()
                );
                report.open_error(&file, &reason)?;
                Ok(None)
            }
        }
    }

    fn execute(&self, a: &Dataset, b: &Dataset, report: &mut ReportWriter<'_>) -> Result<DiffOutcome> {
        let config = &self.config;

        if a.total_cells_real != b.total_cells_real {
            tracing::warn!(
                a_cells = a.total_cells_real,
                b_cells = b.total_cells_real,
                "total real cell counts differ"
            );
            report.cell_count_mismatch(a, b)?;
            return Ok(DiffOutcome::stopped(DiffStatus::CellCountMismatch));
        }

        report.metadata_banner(config.check_metadata)?;
        if !config.check_metadata {
            return match self.resolve(a, b) {
                Ok(correspondence) => self.compare_fields(a, b, correspondence, None, report),
                Err(reason) => {
                    report.unresolved_blocks(&reason)?;
                    Ok(DiffOutcome::stopped(DiffStatus::TopologyMismatch))
                }
            };
        }

        let start = Instant::now();
        log_op_start!("compare_metadata");
        let mut comparison = compare_attributes(a, b, config);
        let mut unresolved = None;
        let correspondence = if comparison.status.is_equivalent() {
            match self.resolve(a, b) {
                Ok(c) => {
                    compare_topology(&mut comparison, a, b, &c, config);
                    Some(c)
                }
                Err(reason) => {
                    comparison.status = DiffStatus::TopologyMismatch;
                    unresolved = Some(reason);
                    None
                }
            }
        } else {
            None
        };
        log_op_end!(
            "compare_metadata",
            duration_ms = start.elapsed().as_millis() as u64,
            status = comparison.status.code()
        );

        report.metadata(&comparison, &a.label, &b.label)?;
        if let Some(reason) = &unresolved {
            report.unresolved_blocks(reason)?;
        }
        match correspondence {
            Some(c) if comparison.status.is_equivalent() => {
                self.compare_fields(a, b, c, Some(comparison), report)
            }
            c => Ok(DiffOutcome {
                status: comparison.status,
                metadata: Some(comparison),
                fields: Vec::new(),
                correspondence: c.map(|c| c.mapping().to_vec()),
            }),
        }
    }

    /// Resolve the block correspondence; `Err` carries the reason for the
    /// report.
    fn resolve(&self, a: &Dataset, b: &Dataset) -> std::result::Result<BlockCorrespondence, String> {
        let start = Instant::now();
        log_op_start!("resolve_correspondence", num_blocks = a.num_blocks);
        match BlockCorrespondence::resolve(a, b) {
            Ok(c) => {
                log_op_end!(
                    "resolve_correspondence",
                    duration_ms = start.elapsed().as_millis() as u64,
                    num_blocks = c.len()
                );
                Ok(c)
            }
            Err(err) => {
                let reason = err.to_string();
                log_op_error!(
                    "resolve_correspondence",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(reason)
            }
        }
    }

    fn compare_fields(
        &self,
        a: &Dataset,
        b: &Dataset,
        correspondence: BlockCorrespondence,
        metadata: Option<MetadataComparison>,
        report: &mut ReportWriter<'_>,
    ) -> Result<DiffOutcome> {
        let config = &self.config;
        report.field_banner(config.tolerance)?;
        let grid = CoordinateGrid::from_dataset(a);
        let names: BTreeSet<&str> = a.field_names().chain(b.field_names()).collect();

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let result = compare_field(name, a, b, &correspondence, config, &grid);
            report.field(&result, &a.label, &b.label)?;
            let stop = result.differs && config.report.stops_at_first_difference();
            fields.push(result);
            if stop {
                break;
            }
        }

        let status = if fields.iter().any(|f| f.differs) {
            DiffStatus::FieldsDiffer
        } else {
            DiffStatus::Equivalent
        };

        Ok(DiffOutcome {
            status,
            metadata,
            fields,
            correspondence: Some(correspondence.mapping().to_vec()),
        })
    }
}

fn describe(err: &ExError) -> String {
    if err.message().is_empty() {
        err.to_string()
    } else {
        err.message().to_string()
    }
}
