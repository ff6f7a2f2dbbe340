//! # Threshold Tracking
//!
//! ```bash
//! cbam threshold lines.json --importer imp_1 --previous previous.json --year 2026
//! ```
//!
//! `--previous` is a JSON object of year to last recorded mass, e.g.
//! `{"2026": 39000.0}`. Without `--year`, every year present in the lines or
//! in `--previous` is recomputed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use cbam_core::CanonicalImportLine;
use cbam_threshold::{
    recompute_years, years_to_recompute, ThresholdAlert, ThresholdSnapshot, YearRecomputation,
};

use crate::config::EngineConfig;
use crate::{read_json, write_json};

/// Arguments for `cbam threshold`.
#[derive(Args, Debug)]
pub struct ThresholdArgs {
    /// Classified lines JSON for one importer.
    pub lines: PathBuf,

    /// Importer id used in alert dedupe keys.
    #[arg(long, default_value = "importer")]
    pub importer: String,

    /// Year to recompute. Repeatable.
    #[arg(long = "year")]
    pub years: Vec<i32>,

    /// JSON object of year -> previously recorded mass in kg.
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Threshold in kg. Overrides the config file.
    #[arg(long)]
    pub threshold_kg: Option<f64>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// One year of the threshold report.
#[derive(Debug, Serialize)]
pub struct YearReport {
    pub snapshot: ThresholdSnapshot,
    pub previous_kg: f64,
    pub alerts: Vec<AlertReport>,
}

/// An alert with its rendered key and message.
#[derive(Debug, Serialize)]
pub struct AlertReport {
    #[serde(flatten)]
    pub alert: ThresholdAlert,
    pub dedupe_key: String,
    pub message: String,
}

impl YearReport {
    fn new(importer: &str, year: YearRecomputation) -> Self {
        let alerts = year
            .alerts
            .into_iter()
            .map(|alert| AlertReport {
                dedupe_key: alert.dedupe_key(importer, year.snapshot.year),
                message: alert.message(),
                alert,
            })
            .collect();
        Self {
            snapshot: year.snapshot,
            previous_kg: year.previous_kg,
            alerts,
        }
    }
}

/// Execute `cbam threshold`.
pub fn run_threshold(args: &ThresholdArgs, config: &EngineConfig) -> Result<u8> {
    let threshold_kg = config.threshold_or(args.threshold_kg);
    if !threshold_kg.is_finite() || threshold_kg <= 0.0 {
        bail!("--threshold-kg must be a positive number, got {threshold_kg}");
    }

    let lines: Vec<CanonicalImportLine> = read_json(&args.lines)?;
    let previous: BTreeMap<i32, f64> = match &args.previous {
        Some(path) => read_json(path)?,
        None => BTreeMap::new(),
    };
    let years = if args.years.is_empty() {
        years_to_recompute(&lines, &previous)
    } else {
        args.years.clone()
    };

    let report: Vec<YearReport> = recompute_years(&lines, &years, &previous, threshold_kg)
        .into_iter()
        .map(|year| YearReport::new(&args.importer, year))
        .collect();

    for year in &report {
        for alert in &year.alerts {
            tracing::warn!(year = year.snapshot.year, "{}", alert.message);
        }
    }
    write_json(&report, args.out.as_deref())?;
    Ok(0)
}
