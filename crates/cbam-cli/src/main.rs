//! # cbam CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cbam_cli::config::EngineConfig;
use cbam_cli::ingest::{run_ingest, run_reclassify, IngestArgs, ReclassifyArgs};
use cbam_cli::pack::{run_pack, PackArgs};
use cbam_cli::reminders::{run_reminders, RemindersArgs};
use cbam_cli::threshold::{run_threshold, ThresholdArgs};

/// CBAM compliance engine CLI
///
/// Normalizes customs import exports, classifies lines against effective-dated
/// CBAM rules, tracks the annual mass threshold, and assembles digest-verified
/// submission packs.
#[derive(Parser, Debug)]
#[command(name = "cbam", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize a customs CSV export and classify its lines.
    Ingest(IngestArgs),

    /// Re-run classification of stored lines against a rule set.
    Reclassify(ReclassifyArgs),

    /// Compute per-year threshold snapshots and crossing alerts.
    Threshold(ThresholdArgs),

    /// List upcoming regulatory deadlines.
    Reminders(RemindersArgs),

    /// Build or verify submission pack archives.
    Pack(PackArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = EngineConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Ingest(args) => run_ingest(args, &config),
        Commands::Reclassify(args) => run_reclassify(args, &config),
        Commands::Threshold(args) => run_threshold(args, &config),
        Commands::Reminders(args) => run_reminders(args, &config),
        Commands::Pack(args) => run_pack(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
