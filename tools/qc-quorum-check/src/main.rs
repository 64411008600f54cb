//! qc-quorum-check: offline quorum intersection analysis
//!
//! Loads a quorum map snapshot, runs the checker and prints the verdict.
//! Exit status: 0 intersection holds, 1 split found, 2 undetermined,
//! 3 the snapshot or flags could not be used.

mod input;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qc_18_quorum_intersection::{
    CheckerConfigBuilder, QuorumIntersectionApi, QuorumIntersectionChecker, TieBreak,
};

use crate::input::Snapshot;
use crate::report::Report;

/// Check whether every pair of quorums in a network intersects
#[derive(Parser, Debug)]
#[command(name = "qc-quorum-check")]
#[command(about = "Offline quorum intersection checker for quorum map snapshots")]
struct Args {
    /// Quorum map snapshot (JSON)
    file: PathBuf,

    /// Give up after this many search calls
    #[arg(long)]
    max_calls: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    time_limit_secs: Option<u64>,

    /// Seed for the random split-node tie-break
    #[arg(long)]
    seed: Option<u64>,

    /// Break split-node ties by lowest index instead of randomly
    #[arg(long)]
    deterministic: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(3);
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(args: &Args) -> Result<ExitCode> {
    let (qmap, names) = Snapshot::load(&args.file)?.into_parts();
    let names = Arc::new(names);

    let mut builder = CheckerConfigBuilder::new();
    if let Some(calls) = args.max_calls {
        builder = builder.max_calls(calls);
    }
    if let Some(secs) = args.time_limit_secs {
        builder = builder.time_limit(Duration::from_secs(secs));
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.deterministic {
        builder = builder.tie_break(TieBreak::LowestIndex);
    }
    let config = builder.build()?;

    let mut checker = QuorumIntersectionChecker::with_resolver(&qmap, config, Arc::clone(&names))?;
    let result = checker.network_enjoys_quorum_intersection();

    let mut report = Report::new(&result, checker.potential_split(), checker.stats().clone());
    report.max_scc = checker.max_scc_members();
    report.unconfigured = checker.unconfigured_nodes().to_vec();
    report.dangling = checker.dangling_references().iter().copied().collect();

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text(&*names));
    }
    Ok(report.verdict.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_flags() {
        let args = Args::parse_from([
            "qc-quorum-check",
            "net.json",
            "--max-calls",
            "500",
            "--time-limit-secs",
            "30",
            "--seed",
            "7",
            "--deterministic",
            "--json",
        ]);

        assert_eq!(args.file, PathBuf::from("net.json"));
        assert_eq!(args.max_calls, Some(500));
        assert_eq!(args.time_limit_secs, Some(30));
        assert_eq!(args.seed, Some(7));
        assert!(args.deterministic);
        assert!(args.json);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_args_require_file() {
        assert!(Args::try_parse_from(["qc-quorum-check"]).is_err());
    }
}
