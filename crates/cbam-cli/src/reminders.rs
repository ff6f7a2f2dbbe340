//! # Deadline Reminders

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;

use cbam_core::DeclarationDate;
use cbam_threshold::{build_deadline_reminders, DeadlineReminder};

use crate::config::EngineConfig;
use crate::write_json;

/// Arguments for `cbam reminders`.
#[derive(Args, Debug)]
pub struct RemindersArgs {
    /// Reference date (YYYY-MM-DD). Defaults to today in UTC.
    #[arg(long)]
    pub today: Option<String>,

    /// Year whose checkpoints to consider. Defaults to the reference date's year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Importer id; when given, each reminder carries its dedupe key.
    #[arg(long)]
    pub importer: Option<String>,

    /// Look-ahead window in days. Overrides the config file.
    #[arg(long)]
    pub window_days: Option<i64>,

    /// Write reminders here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// A reminder as written by `cbam reminders`.
#[derive(Debug, Serialize)]
pub struct ReminderReport {
    #[serde(flatten)]
    pub reminder: DeadlineReminder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe_key: Option<String>,
}

/// Execute `cbam reminders`.
pub fn run_reminders(args: &RemindersArgs, config: &EngineConfig) -> Result<u8> {
    let today = match &args.today {
        Some(raw) => DeclarationDate::parse_strict(raw).context("invalid --today")?,
        None => DeclarationDate::from(Utc::now().date_naive()),
    };
    let window_days = args.window_days.unwrap_or(config.reminder_window_days);
    if window_days < 0 {
        bail!("--window-days must not be negative, got {window_days}");
    }
    let year = args.year.unwrap_or_else(|| today.year());

    let reminders: Vec<ReminderReport> = build_deadline_reminders(today, year, window_days)
        .into_iter()
        .map(|reminder| ReminderReport {
            dedupe_key: args.importer.as_deref().map(|id| reminder.dedupe_key(id)),
            reminder,
        })
        .collect();
    tracing::debug!(%today, year, window_days, reminders = reminders.len(), "deadline reminders");
    write_json(&reminders, args.out.as_deref())?;
    Ok(0)
}
