//! # Threshold Snapshots
//!
//! A snapshot is a pure function of the full line set for one importer and
//! one year. Out-of-scope lines and lines declared in other UTC years are
//! ignored.

use cbam_core::CanonicalImportLine;
use serde::{Deserialize, Serialize};

/// The regulatory yearly mass threshold in kilograms.
pub const DEFAULT_THRESHOLD_KG: f64 = 50_000.0;

/// Where an importer stands relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdStatus {
    /// Below 80 %.
    Safe,
    /// At least 80 %.
    #[serde(rename = "warning_80")]
    Warning80,
    /// At least 90 %.
    #[serde(rename = "warning_90")]
    Warning90,
    /// At or above the threshold.
    Exceeded,
}

impl ThresholdStatus {
    /// Derive the tier from `mass / threshold`.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            Self::Exceeded
        } else if ratio >= 0.9 {
            Self::Warning90
        } else if ratio >= 0.8 {
            Self::Warning80
        } else {
            Self::Safe
        }
    }

    /// Returns the status identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning80 => "warning_80",
            Self::Warning90 => "warning_90",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for ThresholdStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated threshold state for one importer and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSnapshot {
    pub year: i32,
    /// In-scope mass in kilograms, rounded to 3 decimals.
    pub cbam_mass_kg: f64,
    pub threshold_kg: f64,
    pub status: ThresholdStatus,
}

impl ThresholdSnapshot {
    /// Share of the threshold used, e.g. `0.82`.
    pub fn ratio(&self) -> f64 {
        self.cbam_mass_kg / self.threshold_kg
    }
}

/// Round to 3 decimal places (gram precision).
pub(crate) fn round_kg(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Compute the snapshot for `year` from an importer's complete line set.
///
/// `threshold_kg` must be positive; use [`DEFAULT_THRESHOLD_KG`] for the
/// regulatory value. The status is derived from the unrounded sum.
pub fn compute_threshold_snapshot(
    lines: &[CanonicalImportLine],
    year: i32,
    threshold_kg: f64,
) -> ThresholdSnapshot {
    let total_kg: f64 = lines
        .iter()
        .filter(|line| line.cbam_scope)
        .filter(|line| line.year() == year)
        .map(|line| line.net_mass_kg)
        .sum();

    let snapshot = ThresholdSnapshot {
        year,
        cbam_mass_kg: round_kg(total_kg),
        threshold_kg,
        status: ThresholdStatus::from_ratio(total_kg / threshold_kg),
    };
    tracing::debug!(
        year,
        cbam_mass_kg = snapshot.cbam_mass_kg,
        status = %snapshot.status,
        "threshold snapshot computed"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbam_core::{CnCode, CountryCode, DeclarationDate, Eori, ProcedureCode};

    fn line(mass: f64, date: &str, scope: bool) -> CanonicalImportLine {
        CanonicalImportLine {
            importer_eori: Eori::parse("DE123").unwrap(),
            cn_code: CnCode::parse("7208").unwrap(),
            net_mass_kg: mass,
            origin_country: CountryCode::parse("DE").unwrap(),
            declaration_date: DeclarationDate::parse_strict(date).unwrap(),
            procedure_code: ProcedureCode::parse("4000").unwrap(),
            cbam_scope: scope,
            cbam_rule_id: scope.then(|| "steel".to_string()),
            source_row_number: 2,
        }
    }

    #[test]
    fn calculates_snapshot_status_by_year() {
        let lines = vec![
            line(41_000.0, "2026-01-10", true),
            line(10_000.0, "2026-02-10", false),
        ];
        let snapshot = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(snapshot.cbam_mass_kg, 41_000.0);
        assert_eq!(snapshot.status, ThresholdStatus::Warning80);
        assert_eq!(snapshot.threshold_kg, 50_000.0);
        assert_eq!(snapshot.year, 2026);
    }

    #[test]
    fn ignores_other_years() {
        let lines = vec![
            line(30_000.0, "2025-12-31", true),
            line(30_000.0, "2026-01-01", true),
            line(30_000.0, "2027-01-01", true),
        ];
        let snapshot = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(snapshot.cbam_mass_kg, 30_000.0);
        assert_eq!(snapshot.status, ThresholdStatus::Safe);
    }

    #[test]
    fn empty_line_set_is_safe_zero() {
        let snapshot = compute_threshold_snapshot(&[], 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(snapshot.cbam_mass_kg, 0.0);
        assert_eq!(snapshot.status, ThresholdStatus::Safe);
    }

    #[test]
    fn rounds_to_three_decimals() {
        let lines = vec![line(0.0004, "2026-01-10", true), line(1.2345, "2026-01-11", true)];
        let snapshot = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(snapshot.cbam_mass_kg, 1.235);
    }

    #[test]
    fn status_boundaries_are_inclusive() {
        assert_eq!(ThresholdStatus::from_ratio(0.7999), ThresholdStatus::Safe);
        assert_eq!(ThresholdStatus::from_ratio(0.8), ThresholdStatus::Warning80);
        assert_eq!(ThresholdStatus::from_ratio(0.9), ThresholdStatus::Warning90);
        assert_eq!(ThresholdStatus::from_ratio(1.0), ThresholdStatus::Exceeded);
        assert_eq!(ThresholdStatus::from_ratio(3.0), ThresholdStatus::Exceeded);
    }

    #[test]
    fn exactly_at_threshold_is_exceeded() {
        let lines = vec![line(25_000.0, "2026-01-10", true), line(25_000.0, "2026-06-10", true)];
        let snapshot = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(snapshot.status, ThresholdStatus::Exceeded);
        assert_eq!(snapshot.ratio(), 1.0);
    }

    #[test]
    fn custom_threshold() {
        let lines = vec![line(900.0, "2026-01-10", true)];
        let snapshot = compute_threshold_snapshot(&lines, 2026, 1_000.0);
        assert_eq!(snapshot.status, ThresholdStatus::Warning90);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let lines = vec![line(41_000.0, "2026-01-10", true), line(5_500.5, "2026-03-10", true)];
        let a = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        let b = compute_threshold_snapshot(&lines, 2026, DEFAULT_THRESHOLD_KG);
        assert_eq!(a, b);
    }

    #[test]
    fn status_serializes_with_tier_names() {
        assert_eq!(
            serde_json::to_string(&ThresholdStatus::Warning80).unwrap(),
            "\"warning_80\""
        );
        assert_eq!(serde_json::to_string(&ThresholdStatus::Safe).unwrap(), "\"safe\"");
    }
}
