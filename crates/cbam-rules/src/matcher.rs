//! # Rule Matcher
//!
//! Resolves the single rule that governs a code on a date:
//!
//! 1. Keep rules that are active and whose window contains the date. Both
//!    ends of the window are inclusive; an absent end is open.
//! 2. Keep rules whose pattern matches the code. Code and pattern are both
//!    compared with whitespace removed and uppercased.
//! 3. Rank by pattern length as written (longest first), then `exact`
//!    before `prefix`, then rule id ascending. Whitespace inside a pattern
//!    counts toward its length even though matching ignores it.
//!
//! The id tie-break makes the result independent of the order rules were
//! supplied in, for any set with unique ids.

use std::cmp::Ordering;

use cbam_core::DeclarationDate;

use crate::rule::{normalize_code, CbamRule, RuleMatchType};

/// Whether `rule` is active and in force on `date`.
pub(crate) fn is_effective(rule: &CbamRule, date: DeclarationDate) -> bool {
    let from_ok = date >= rule.effective_from;
    let to_ok = rule.effective_to.map_or(true, |to| date <= to);
    rule.active && from_ok && to_ok
}

fn pattern_matches(rule: &CbamRule, normalized_code: &str) -> bool {
    let pattern = rule.normalized_pattern();
    match rule.match_type {
        RuleMatchType::Exact => normalized_code == pattern,
        RuleMatchType::Prefix => normalized_code.starts_with(&pattern),
    }
}

fn match_type_rank(match_type: RuleMatchType) -> u8 {
    match match_type {
        RuleMatchType::Exact => 0,
        RuleMatchType::Prefix => 1,
    }
}

/// Most specific first.
fn by_specificity(left: &CbamRule, right: &CbamRule) -> Ordering {
    let left_len = left.cn_code_pattern.chars().count();
    let right_len = right.cn_code_pattern.chars().count();
    right_len
        .cmp(&left_len)
        .then_with(|| match_type_rank(left.match_type).cmp(&match_type_rank(right.match_type)))
        .then_with(|| left.id.cmp(&right.id))
}

/// Find the rule that classifies `cn_code` on `declaration_date`.
///
/// Returns `None` when no active, in-window rule matches.
pub fn match_cbam_rule<'a>(
    cn_code: &str,
    declaration_date: DeclarationDate,
    rules: &'a [CbamRule],
) -> Option<&'a CbamRule> {
    let code = normalize_code(cn_code);
    let matched = rules
        .iter()
        .filter(|rule| is_effective(rule, declaration_date))
        .filter(|rule| pattern_matches(rule, &code))
        .min_by(|a, b| by_specificity(a, b));

    if let Some(rule) = matched {
        tracing::trace!(cn_code = %code, date = %declaration_date, rule = %rule.id, "rule matched");
    }
    matched
}

/// Whether `cn_code` is in scope on `declaration_date`.
pub fn is_cbam_scope(cn_code: &str, declaration_date: DeclarationDate, rules: &[CbamRule]) -> bool {
    match_cbam_rule(cn_code, declaration_date, rules).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(s: &str) -> DeclarationDate {
        DeclarationDate::parse_strict(s).unwrap()
    }

    fn rule(id: &str, pattern: &str, match_type: RuleMatchType, category: &str) -> CbamRule {
        CbamRule {
            id: id.to_string(),
            cn_code_pattern: pattern.to_string(),
            match_type,
            active: true,
            effective_from: day("2026-01-01"),
            effective_to: None,
            category: category.to_string(),
            change_reason: None,
        }
    }

    fn chapter_rules() -> Vec<CbamRule> {
        vec![
            rule("1", "72", RuleMatchType::Prefix, "iron_steel"),
            rule("2", "7208", RuleMatchType::Prefix, "iron_steel_specific"),
            rule("3", "72081000", RuleMatchType::Exact, "exact"),
        ]
    }

    #[test]
    fn prefers_longest_and_exact_match() {
        let rules = chapter_rules();
        let matched = match_cbam_rule("72081000", day("2026-05-01"), &rules);
        assert_eq!(matched.map(|r| r.id.as_str()), Some("3"));
    }

    #[test]
    fn respects_effective_date_windows() {
        let rules = chapter_rules();
        assert!(match_cbam_rule("72081000", day("2025-12-31"), &rules).is_none());
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let rules = chapter_rules();
        let matched = match_cbam_rule("72091500", day("2026-05-01"), &rules);
        assert_eq!(matched.map(|r| r.id.as_str()), Some("1"));
        let matched = match_cbam_rule("72089000", day("2026-05-01"), &rules);
        assert_eq!(matched.map(|r| r.id.as_str()), Some("2"));
    }

    #[test]
    fn no_match_outside_pattern() {
        let rules = chapter_rules();
        assert!(!is_cbam_scope("73011000", day("2026-05-01"), &rules));
        assert!(is_cbam_scope("72011000", day("2026-05-01"), &rules));
    }

    #[test]
    fn exact_rule_does_not_match_longer_code() {
        let rules = vec![rule("x", "7208", RuleMatchType::Exact, "x")];
        assert!(match_cbam_rule("72081000", day("2026-05-01"), &rules).is_none());
        assert!(match_cbam_rule("7208", day("2026-05-01"), &rules).is_some());
    }

    #[test]
    fn window_end_is_inclusive() {
        let mut r = rule("1", "72", RuleMatchType::Prefix, "x");
        r.effective_to = Some(day("2026-06-30"));
        let rules = vec![r];
        assert!(is_cbam_scope("7208", day("2026-06-30"), &rules));
        assert!(!is_cbam_scope("7208", day("2026-07-01"), &rules));
        assert!(is_cbam_scope("7208", day("2026-01-01"), &rules));
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let mut r = rule("1", "72", RuleMatchType::Prefix, "x");
        r.active = false;
        assert!(!is_cbam_scope("7208", day("2026-06-30"), &[r]));
    }

    #[test]
    fn whitespace_and_case_are_normalized() {
        let rules = vec![rule("1", "ex 72 08", RuleMatchType::Prefix, "x")];
        assert!(is_cbam_scope("EX7208 10", day("2026-02-01"), &rules));
        assert!(is_cbam_scope("ex720810", day("2026-02-01"), &rules));
    }

    #[test]
    fn exact_beats_prefix_at_equal_length() {
        let rules = vec![
            rule("p", "7208", RuleMatchType::Prefix, "prefix"),
            rule("e", "7208", RuleMatchType::Exact, "exact"),
        ];
        let matched = match_cbam_rule("7208", day("2026-02-01"), &rules);
        assert_eq!(matched.map(|r| r.id.as_str()), Some("e"));
    }

    #[test]
    fn equal_rank_resolves_by_id_regardless_of_order() {
        let a = rule("a", "7208", RuleMatchType::Prefix, "first");
        let b = rule("b", "7208", RuleMatchType::Prefix, "second");
        let forward = vec![a.clone(), b.clone()];
        let reverse = vec![b, a];
        let d = day("2026-02-01");
        assert_eq!(match_cbam_rule("72081000", d, &forward).map(|r| r.id.as_str()), Some("a"));
        assert_eq!(match_cbam_rule("72081000", d, &reverse).map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn written_pattern_length_decides_specificity() {
        let rules = vec![
            rule("tight", "720810", RuleMatchType::Prefix, "tight"),
            rule("spaced", "72 08 1", RuleMatchType::Prefix, "spaced"),
        ];
        let matched = match_cbam_rule("72081000", day("2026-01-01"), &rules);
        assert_eq!(matched.map(|r| r.id.as_str()), Some("spaced"));
    }

    #[test]
    fn empty_rule_set_matches_nothing() {
        assert!(match_cbam_rule("72081000", day("2026-02-01"), &[]).is_none());
    }

    proptest! {
        #[test]
        fn nothing_matches_before_effective_from(offset in 1i64..3650) {
            let rules = chapter_rules();
            let date = day("2026-01-01").offset_days(-offset).unwrap();
            prop_assert!(match_cbam_rule("72081000", date, &rules).is_none());
        }

        #[test]
        fn result_is_order_independent(seed in 0usize..6) {
            let mut rules = chapter_rules();
            let n = rules.len();
            rules.rotate_left(seed % n);
            if seed >= 3 {
                rules.reverse();
            }
            let matched = match_cbam_rule("72081000", day("2026-05-01"), &rules);
            prop_assert_eq!(matched.map(|r| r.id.as_str()), Some("3"));
        }
    }
}
