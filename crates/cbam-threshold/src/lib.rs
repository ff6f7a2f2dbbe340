//! # cbam-threshold: Yearly Mass Threshold Tracking
//!
//! An importer is exempt while its in-scope imports for a calendar year
//! stay under a fixed mass threshold (50 000 kg by default). This crate
//! computes where an importer stands and what changed.
//!
//! - **Snapshots** (`snapshot.rs`): sum of in-scope mass for one UTC year,
//!   plus a status tier derived from the ratio to the threshold.
//! - **Alerts** (`alerts.rs`): the 80 %, 90 % and 100 % boundaries crossed
//!   between two snapshot masses.
//! - **Recomputation** (`recompute.rs`): snapshot and alerts for each year
//!   touched by a reprocessed file.
//! - **Deadlines** (`deadline.rs`): upcoming regulatory dates within a
//!   reminder window.
//!
//! Snapshots are always rebuilt from the complete line set for the
//! importer, never patched incrementally, so recomputing after a file is
//! reprocessed gives the same answer as computing from scratch.

pub mod alerts;
pub mod deadline;
pub mod recompute;
pub mod snapshot;

pub use alerts::{build_threshold_alerts, ThresholdAlert, ThresholdBoundary};
pub use deadline::{build_deadline_reminders, DeadlineReminder, DEFAULT_REMINDER_WINDOW_DAYS};
pub use recompute::{affected_years, recompute_years, years_to_recompute, YearRecomputation};
pub use snapshot::{
    compute_threshold_snapshot, ThresholdSnapshot, ThresholdStatus, DEFAULT_THRESHOLD_KG,
};
