//! File comparison command

use crate::Cli;
use blockdiff_core::diff::{DiffEngine, DiffStatus};
use blockdiff_core::model::{DiffConfig, ReportMode};
use blockdiff_store::SnapshotReader;
use std::io::Write;

/// Build the run configuration from command-line flags.
pub fn config_from_args(cli: &Cli) -> DiffConfig {
    DiffConfig::default()
        .with_tolerance(cli.tol)
        .with_check_metadata(!cli.ignore_metadata)
        .with_relative(cli.relative)
        .with_report(ReportMode::from_flags(cli.all, cli.one, cli.brief, cli.quiet))
}

/// Compare the two files named on the command line and report to stdout.
pub fn execute(cli: &Cli) -> Result<DiffStatus, Box<dyn std::error::Error>> {
    let (path_a, path_b) = match cli.files.as_slice() {
        [a, b] => (a, b),
        _ => return Err("exactly two files are required".into()),
    };

    let config = config_from_args(cli);
    tracing::debug!(
        tolerance = config.tolerance,
        check_metadata = config.check_metadata,
        relative = config.relative,
        report = ?config.report,
        "configuration"
    );

    let engine = DiffEngine::new(SnapshotReader::new(), config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = engine.run(path_a, path_b, &mut out)?;
    out.flush()?;

    Ok(outcome.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::parse_from(["blockdiff", "-q", "-o", "-i", "-r", "--tol=1e-6", "a", "b"]);
        let cfg = config_from_args(&cli);
        assert_eq!(cfg.report, ReportMode::Quiet);
        assert_eq!(cfg.tolerance, 1e-6);
        assert!(!cfg.check_metadata);
        assert!(cfg.relative);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["blockdiff", "a", "b"]);
        let cfg = config_from_args(&cli);
        assert_eq!(cfg, DiffConfig::default());
    }
}
