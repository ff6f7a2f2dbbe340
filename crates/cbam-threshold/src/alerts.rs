//! # Threshold Alerts
//!
//! Diffs two snapshot masses against the fixed boundaries (80 %, 90 %,
//! 100 %). A boundary is crossed when the previous ratio is strictly below
//! it and the new ratio is at or above it. A single jump can cross several
//! boundaries; alerts are always emitted in ascending boundary order.
//!
//! The diff is pure, so the same `(previous, current)` pair always yields
//! the same alerts and the same [`ThresholdAlert::dedupe_key`]s. Callers
//! persisting alerts can rely on the key to drop repeats.

use serde::{Deserialize, Serialize};

use crate::snapshot::ThresholdStatus;

/// A threshold boundary that can trigger an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThresholdBoundary {
    /// 80 % of the threshold.
    #[serde(rename = "warning_80")]
    Warning80,
    /// 90 % of the threshold.
    #[serde(rename = "warning_90")]
    Warning90,
    /// 100 % of the threshold.
    #[serde(rename = "exceeded")]
    Exceeded,
}

impl ThresholdBoundary {
    /// All boundaries, ascending.
    pub const ALL: [ThresholdBoundary; 3] = [Self::Warning80, Self::Warning90, Self::Exceeded];

    /// The boundary as a fraction of the threshold.
    pub fn ratio(&self) -> f64 {
        match self {
            Self::Warning80 => 0.8,
            Self::Warning90 => 0.9,
            Self::Exceeded => 1.0,
        }
    }

    /// The status tier entered when this boundary is crossed.
    pub fn status(&self) -> ThresholdStatus {
        match self {
            Self::Warning80 => ThresholdStatus::Warning80,
            Self::Warning90 => ThresholdStatus::Warning90,
            Self::Exceeded => ThresholdStatus::Exceeded,
        }
    }
}

impl std::fmt::Display for ThresholdBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status().as_str())
    }
}

/// One boundary crossed between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    pub status: ThresholdBoundary,
    pub threshold_ratio: f64,
    pub previous_kg: f64,
    pub current_kg: f64,
}

impl ThresholdAlert {
    /// Stable key identifying this alert for an importer and year.
    ///
    /// Format: `threshold:{importer}:{year}:{status}:{current_kg:.3}`.
    pub fn dedupe_key(&self, importer_id: &str, year: i32) -> String {
        format!(
            "threshold:{importer_id}:{year}:{}:{:.3}",
            self.status, self.current_kg
        )
    }

    /// Human-readable notification text.
    pub fn message(&self) -> String {
        let pct = (self.threshold_ratio * 100.0).round();
        format!(
            "Importer crossed {pct}% threshold ({:.3} kg).",
            self.current_kg
        )
    }
}

/// Alerts for every boundary crossed moving from `previous_kg` to `current_kg`.
///
/// Pass `0.0` for `previous_kg` when no snapshot was recorded before.
/// `threshold_kg` must be positive.
pub fn build_threshold_alerts(
    previous_kg: f64,
    current_kg: f64,
    threshold_kg: f64,
) -> Vec<ThresholdAlert> {
    let previous_ratio = previous_kg / threshold_kg;
    let current_ratio = current_kg / threshold_kg;

    let alerts: Vec<ThresholdAlert> = ThresholdBoundary::ALL
        .into_iter()
        .filter(|b| previous_ratio < b.ratio() && current_ratio >= b.ratio())
        .map(|status| ThresholdAlert {
            status,
            threshold_ratio: status.ratio(),
            previous_kg,
            current_kg,
        })
        .collect();

    if !alerts.is_empty() {
        tracing::debug!(previous_kg, current_kg, count = alerts.len(), "threshold boundaries crossed");
    }
    alerts
}
