//! # Scope Classification
//!
//! Tags each line with its scope flag and the id of the rule that decided
//! it. The tag is fixed at classification time; editing the rule table
//! later does not change existing lines until [`reclassify`] is run.

use cbam_core::{CanonicalImportLine, ParsedImportLine};

use crate::matcher::match_cbam_rule;
use crate::rule::CbamRule;

/// Classify one parsed line.
pub fn classify_line(line: ParsedImportLine, rules: &[CbamRule]) -> CanonicalImportLine {
    let rule_id = match_cbam_rule(line.cn_code.as_str(), line.declaration_date, rules)
        .map(|rule| rule.id.clone());
    CanonicalImportLine::from_parsed(line, rule_id)
}

/// Classify every parsed line of a file, preserving order.
pub fn apply_cbam_classification(
    rows: Vec<ParsedImportLine>,
    rules: &[CbamRule],
) -> Vec<CanonicalImportLine> {
    let lines: Vec<CanonicalImportLine> = rows
        .into_iter()
        .map(|row| classify_line(row, rules))
        .collect();
    let in_scope = lines.iter().filter(|l| l.cbam_scope).count();
    tracing::debug!(lines = lines.len(), in_scope, "classified import lines");
    lines
}

/// Re-run classification on already classified lines against `rules`.
///
/// Only `cbam_scope` and `cbam_rule_id` can change.
pub fn reclassify(lines: &[CanonicalImportLine], rules: &[CbamRule]) -> Vec<CanonicalImportLine> {
    let mut changed = 0usize;
    let out: Vec<CanonicalImportLine> = lines
        .iter()
        .map(|line| {
            let rule_id = match_cbam_rule(line.cn_code.as_str(), line.declaration_date, rules)
                .map(|rule| rule.id.clone());
            if rule_id != line.cbam_rule_id {
                changed += 1;
            }
            CanonicalImportLine {
                cbam_scope: rule_id.is_some(),
                cbam_rule_id: rule_id,
                ..line.clone()
            }
        })
        .collect();
    tracing::debug!(lines = out.len(), changed, "reclassified import lines");
    out
}
