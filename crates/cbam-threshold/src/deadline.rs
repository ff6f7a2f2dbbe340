//! # Declaration Deadline Reminders
//!
//! Two fixed checkpoints recur every year:
//!
//! - 31 March: provisional continuation application checkpoint.
//! - 30 September: annual declaration and surrender deadline.
//!
//! A reminder is due when a checkpoint is between 0 and `window_days` UTC
//! days away. Scheduling the check is the caller's concern.

use cbam_core::DeclarationDate;
use serde::{Deserialize, Serialize};

/// Default reminder lead time.
pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 30;

/// An upcoming regulatory date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineReminder {
    /// Stable code, e.g. `cbam_annual_2026_09_30`.
    pub code: String,
    pub date: DeclarationDate,
    pub days_remaining: i64,
    pub message: String,
}

impl DeadlineReminder {
    /// Key identifying this reminder for one importer on one day, e.g.
    /// `deadline:imp_1:cbam_annual_2026_09_30:20`.
    pub fn dedupe_key(&self, importer_id: &str) -> String {
        format!("deadline:{importer_id}:{}:{}", self.code, self.days_remaining)
    }
}

/// Checkpoints in `year` that fall within `window_days` of `today`.
pub fn build_deadline_reminders(
    today: DeclarationDate,
    year: i32,
    window_days: i64,
) -> Vec<DeadlineReminder> {
    let checkpoints = [
        (
            format!("cbam_provisional_{year}_03_31"),
            DeclarationDate::from_ymd(year, 3, 31),
            "CBAM provisional continuation application checkpoint (31 March).",
        ),
        (
            format!("cbam_annual_{year}_09_30"),
            DeclarationDate::from_ymd(year, 9, 30),
            "CBAM annual declaration and surrender deadline (30 September).",
        ),
    ];

    checkpoints
        .into_iter()
        .filter_map(|(code, date, message)| {
            let date = date?;
            let days_remaining = today.days_until(date);
            (0..=window_days).contains(&days_remaining).then(|| DeadlineReminder {
                code,
                date,
                days_remaining,
                message: message.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DeclarationDate {
        DeclarationDate::parse_strict(s).unwrap()
    }

    #[test]
    fn reminder_inside_window() {
        let reminders = build_deadline_reminders(day("2026-03-10"), 2026, 30);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].code, "cbam_provisional_2026_03_31");
        assert_eq!(reminders[0].days_remaining, 21);
        assert_eq!(reminders[0].date.to_iso_date(), "2026-03-31");
        assert_eq!(
            reminders[0].dedupe_key("imp_1"),
            "deadline:imp_1:cbam_provisional_2026_03_31:21"
        );
    }

    #[test]
    fn deadline_day_itself_is_included() {
        let reminders = build_deadline_reminders(day("2026-09-30"), 2026, 30);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].code, "cbam_annual_2026_09_30");
        assert_eq!(reminders[0].days_remaining, 0);
    }

    #[test]
    fn past_and_distant_deadlines_are_skipped() {
        assert!(build_deadline_reminders(day("2026-06-01"), 2026, 30).is_empty());
        assert!(build_deadline_reminders(day("2026-10-01"), 2026, 30).is_empty());
    }

    #[test]
    fn window_edge() {
        assert_eq!(build_deadline_reminders(day("2026-08-31"), 2026, 30).len(), 1);
        assert!(build_deadline_reminders(day("2026-08-30"), 2026, 30).is_empty());
    }

    #[test]
    fn wide_window_returns_both_in_order() {
        let reminders = build_deadline_reminders(day("2026-01-01"), 2026, 365);
        let codes: Vec<&str> = reminders.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["cbam_provisional_2026_03_31", "cbam_annual_2026_09_30"]);
    }
}
