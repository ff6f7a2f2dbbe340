//! # Per-Year Recomputation
//!
//! When a customs file is (re)processed, every year it touches needs a
//! fresh snapshot and an alert diff against the last recorded mass. The
//! caller supplies the importer's complete line set after the file's lines
//! were fully replaced; this module never works from deltas.

use std::collections::{BTreeMap, BTreeSet};

use cbam_core::CanonicalImportLine;
use serde::{Deserialize, Serialize};

use crate::alerts::{build_threshold_alerts, ThresholdAlert};
use crate::snapshot::{compute_threshold_snapshot, ThresholdSnapshot};

/// Snapshot and alerts for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecomputation {
    pub snapshot: ThresholdSnapshot,
    /// Mass recorded before this recomputation (0 if none).
    pub previous_kg: f64,
    pub alerts: Vec<ThresholdAlert>,
}

/// Distinct UTC declaration years present in `lines`, ascending.
///
/// Every line counts, in scope or not. A year whose lines were all removed
/// by reprocessing is absent here; use [`years_to_recompute`] to include
/// years that still have a recorded snapshot.
pub fn affected_years(lines: &[CanonicalImportLine]) -> Vec<i32> {
    lines
        .iter()
        .map(CanonicalImportLine::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Years present in `lines` plus every year with a recorded snapshot in
/// `previous`, ascending.
///
/// Recomputing a recorded year with no remaining lines yields a zero
/// snapshot, so its stored mass drops instead of going stale.
pub fn years_to_recompute(
    lines: &[CanonicalImportLine],
    previous: &BTreeMap<i32, f64>,
) -> Vec<i32> {
    lines
        .iter()
        .map(CanonicalImportLine::year)
        .chain(previous.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Recompute each of `years` from the importer's complete line set.
///
/// `previous` maps year to the last recorded snapshot mass; a missing year
/// is treated as 0. Years are processed independently and returned in the
/// order given.
pub fn recompute_years(
    lines: &[CanonicalImportLine],
    years: &[i32],
    previous: &BTreeMap<i32, f64>,
    threshold_kg: f64,
) -> Vec<YearRecomputation> {
    years
        .iter()
        .map(|&year| {
            let snapshot = compute_threshold_snapshot(lines, year, threshold_kg);
            let previous_kg = previous.get(&year).copied().unwrap_or(0.0);
            let alerts = build_threshold_alerts(previous_kg, snapshot.cbam_mass_kg, threshold_kg);
            YearRecomputation {
                snapshot,
                previous_kg,
                alerts,
            }
        })
        .collect()
}
