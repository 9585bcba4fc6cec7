//! docpair CLI
//!
//! Checks that an actual document tree and its ground truth have the same
//! shape along a set of traversal paths.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docpair_core::{AlignmentReport, Document, Pair, TraversalPath};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "docpair")]
#[command(
    about = "Check structural alignment of actual and ground-truth documents",
    long_about = None
)]
struct Cli {
    /// Actual document tree (.json, .yaml or .yml)
    actual: PathBuf,

    /// Ground-truth document tree (.json, .yaml or .yml)
    groundtruth: PathBuf,

    /// Traversal path to check: "r" for the root, or steps of 'm'/'c'
    #[arg(short, long = "path", value_parser = parse_path, default_values = ["m", "c"])]
    paths: Vec<TraversalPath>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_path(s: &str) -> Result<TraversalPath, String> {
    TraversalPath::parse(s).map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "docpair=debug,docpair_core=debug"
    } else {
        "docpair=info,docpair_core=info"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Exit status when either document cannot be loaded or the report cannot be written.
const LOAD_FAILURE: u8 = 2;

/// 0 when every level lined up, 1 on any structural mismatch.
fn exit_code(report: &AlignmentReport) -> u8 {
    if report.is_aligned() {
        0
    } else {
        1
    }
}

fn run(cli: &Cli) -> Result<AlignmentReport> {
    let actual = Document::from_path(&cli.actual)
        .with_context(|| format!("Failed to load actual document {}", cli.actual.display()))?;
    let groundtruth = Document::from_path(&cli.groundtruth).with_context(|| {
        format!(
            "Failed to load ground-truth document {}",
            cli.groundtruth.display()
        )
    })?;

    tracing::debug!(
        actual = actual.tree_size(),
        groundtruth = groundtruth.tree_size(),
        paths = cli.paths.len(),
        "Loaded document trees"
    );

    Ok(AlignmentReport::check(
        Pair::new(&actual, &groundtruth),
        &cli.paths,
    ))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(LOAD_FAILURE);
        }
    };

    match cli.format {
        Format::Text => print!("{}", report),
        Format::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return ExitCode::from(LOAD_FAILURE);
            }
        },
    }

    ExitCode::from(exit_code(&report))
}
