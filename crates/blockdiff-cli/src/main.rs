//! blockdiff CLI
//!
//! Compares two AMR snapshot files and exits with a status code describing
//! how they differ.

use blockdiff_core::logging_facility::{init, Profile};
use blockdiff_core::DiffStatus;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

mod commands;

/// Exit status for usage errors, an invalid tolerance, and a failure to
/// write the report to stdout. Shared with "first file unreadable"; the
/// cases are told apart by the `Error:` line on stderr, which only the
/// non-comparison failures print.
const EXIT_USAGE: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "blockdiff", version)]
#[command(
    about = "Compare two block-structured AMR snapshots within a tolerance",
    long_about = None
)]
pub struct Cli {
    /// Report all diffs at all positions (default)
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Only report the worst point of the first differing field, then stop
    #[arg(short = 'o', long = "one")]
    pub one: bool,

    /// Only report whether the files differ; overrides --all and --one
    #[arg(short = 'b', long = "brief")]
    pub brief: bool,

    /// Like --brief, without any other output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Tolerance for comparisons
    #[arg(short = 't', long = "tol", value_name = "EPS", default_value_t = blockdiff_core::model::DEFAULT_TOLERANCE)]
    pub tol: f64,

    /// Ignore differences in metadata
    #[arg(short = 'i', long = "ignore-metadata")]
    pub ignore_metadata: bool,

    /// Compare relative differences using the first file as the reference;
    /// points where the first file is zero are ignored
    #[arg(short = 'r', long = "relative")]
    pub relative: bool,

    /// Format of diagnostic logs on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,

    /// The two snapshot files to compare
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Human,
    Json,
}

impl LogFormat {
    fn profile(self) -> Profile {
        match self {
            LogFormat::Human => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
    };

    init(cli.log_format.profile());

    if cli.files.len() != 2 {
        let mut cmd = Cli::command();
        let _ = cmd.print_help();
        std::process::exit(EXIT_USAGE);
    }

    std::process::exit(exit_code(commands::compare::execute(&cli)));
}

/// Map the command result onto the process exit status.
fn exit_code(result: Result<DiffStatus, Box<dyn std::error::Error>>) -> i32 {
    match result {
        Ok(status) => status.code(),
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_USAGE
        }
    }
}
