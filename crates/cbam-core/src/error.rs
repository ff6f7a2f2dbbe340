//! # Error Types
//!
//! Errors raised by the validated constructors in this crate. Normalization
//! never surfaces these directly; it folds them into field-level
//! [`ParseError`](crate::records::ParseError) records instead.

use thiserror::Error;

/// Top-level error type for `cbam-core`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CbamError {
    /// A declaration identifier failed its format check.
    #[error("invalid {kind}: {reason}")]
    InvalidIdentifier {
        /// Which identifier was being constructed (e.g. "EORI").
        kind: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A mass value was not a finite positive number.
    #[error("invalid mass: {0}")]
    InvalidMass(String),

    /// A date or timestamp string did not parse.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A digest string was not 64 lowercase hex characters.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}
