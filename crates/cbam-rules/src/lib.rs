//! # cbam-rules: CN Code Rules and Scope Classification
//!
//! Decides whether a declared goods code falls under the regime on a given
//! date.
//!
//! - **Rules** (`rule.rs`): the [`CbamRule`] record, its `exact`/`prefix`
//!   match types, and [`RuleSet`], a validated snapshot loaded from YAML or
//!   JSON.
//! - **Matcher** (`matcher.rs`): effective-date filtering followed by
//!   specificity ranking. Total: no match is a normal result.
//! - **Classification** (`classify.rs`): attaches the scope flag and matched
//!   rule id to parsed lines, and re-runs it on demand for existing lines.
//!
//! The caller passes the rule set explicitly on every call. Nothing is
//! cached between calls.

pub mod classify;
pub mod error;
pub mod matcher;
pub mod rule;

pub use classify::{apply_cbam_classification, classify_line, reclassify};
pub use error::RuleError;
pub use matcher::{is_cbam_scope, match_cbam_rule};
pub use rule::{CbamRule, RuleMatchType, RuleSet};
