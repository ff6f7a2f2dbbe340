//! # Ingest and Reclassify
//!
//! ```bash
//! cbam ingest export.csv --mapping mapping.json --rules rules.yaml --out lines.json
//! cbam reclassify lines.json --rules rules-2027.yaml --out lines.json
//! ```
//!
//! A file with any validation error is rejected whole: the errors are
//! printed to stderr, nothing is written, and the exit code is 2.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use cbam_core::{CanonicalImportLine, SourceMapping};
use cbam_ingest::parse_and_normalize_csv;
use cbam_rules::{apply_cbam_classification, reclassify, RuleSet};

use crate::config::EngineConfig;
use crate::{load_rules, read_json, write_json, EXIT_REJECTED};

/// Arguments for `cbam ingest`.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Customs export CSV with a header row.
    pub csv: PathBuf,

    /// JSON column mapping (canonical field -> source column).
    #[arg(long)]
    pub mapping: PathBuf,

    /// Rule set (YAML, or JSON by extension). Falls back to the config file.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Write classified lines here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `cbam reclassify`.
#[derive(Args, Debug)]
pub struct ReclassifyArgs {
    /// Classified lines JSON, as written by `cbam ingest`.
    pub lines: PathBuf,

    /// Rule set to classify against. Falls back to the config file.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Write reclassified lines here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute `cbam ingest`.
pub fn run_ingest(args: &IngestArgs, config: &EngineConfig) -> Result<u8> {
    let mapping: SourceMapping = read_json(&args.mapping)?;
    let rules = resolve_rules(args.rules.as_deref(), config)?;
    let input = std::fs::read(&args.csv)
        .with_context(|| format!("failed to read {}", args.csv.display()))?;

    let rows = match parse_and_normalize_csv(&input, &mapping).into_accepted() {
        Ok(rows) => rows,
        Err(errors) => {
            eprintln!(
                "{}: rejected with {} validation error(s)",
                args.csv.display(),
                errors.len()
            );
            for error in &errors {
                eprintln!("  {error}");
            }
            return Ok(EXIT_REJECTED);
        }
    };

    let lines = apply_cbam_classification(rows, rules.rules());
    let in_scope = lines.iter().filter(|l| l.cbam_scope).count();
    tracing::info!(lines = lines.len(), in_scope, "ingested {}", args.csv.display());
    write_json(&lines, args.out.as_deref())?;
    Ok(0)
}

/// Execute `cbam reclassify`.
pub fn run_reclassify(args: &ReclassifyArgs, config: &EngineConfig) -> Result<u8> {
    let lines: Vec<CanonicalImportLine> = read_json(&args.lines)?;
    let rules = resolve_rules(args.rules.as_deref(), config)?;
    let updated = reclassify(&lines, rules.rules());
    write_json(&updated, args.out.as_deref())?;
    Ok(0)
}

fn resolve_rules(flag: Option<&Path>, config: &EngineConfig) -> Result<RuleSet> {
    let path = config
        .rules_or(flag)
        .context("no rule set given: pass --rules or set `rules` in the config file")?;
    load_rules(&path)
}
