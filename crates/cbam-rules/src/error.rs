//! # Rule Errors
//!
//! Raised only when building a [`RuleSet`](crate::RuleSet). Matching and
//! classification themselves never fail.

use thiserror::Error;

/// Errors from loading or validating a rule set.
#[derive(Error, Debug)]
pub enum RuleError {
    /// `effective_from` is after `effective_to`.
    #[error("rule {id}: effective_from {from} is after effective_to {to}")]
    InvalidWindow {
        /// Offending rule id.
        id: String,
        /// Start of the window.
        from: String,
        /// End of the window.
        to: String,
    },

    /// The CN code pattern is empty after whitespace is removed.
    #[error("rule {0}: cn_code_pattern is blank")]
    BlankPattern(String),

    /// Two rules share an id.
    #[error("duplicate rule id: {0}")]
    DuplicateId(String),

    /// YAML rule document did not parse.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON rule document did not parse.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
