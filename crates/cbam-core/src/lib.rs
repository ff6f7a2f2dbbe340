//! # cbam-core: Foundational Types for the CBAM Engine
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other `cbam-*` crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for declaration fields.** `Eori`, `CnCode`,
//!    `CountryCode`, `ProcedureCode` all have validated constructors. A
//!    `CanonicalImportLine` can only hold values that passed validation.
//!
//! 2. **Day-granular UTC dates.** `DeclarationDate` is a calendar day that
//!    is interpreted as UTC midnight. There is no local-time path.
//!
//! 3. **Kilograms everywhere.** `MassUnit::to_kg()` is the single conversion
//!    point. Every mass stored on a record is already in kilograms.
//!
//! 4. **Lowercase hex SHA-256.** `ContentDigest` renders to the 64-character
//!    lowercase form used in manifests and audit trails.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cbam-*` crates.
//! - No I/O.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod records;
pub mod temporal;
pub mod units;

pub use digest::{sha256_bytes, sha256_hex, ContentDigest};
pub use error::CbamError;
pub use identity::{CnCode, CountryCode, Eori, ProcedureCode};
pub use records::{
    CanonicalImportLine, ParseError, ParseField, ParseResult, ParsedImportLine, SourceMapping,
    REQUIRED_CANONICAL_FIELDS,
};
pub use temporal::{DeclarationDate, Timestamp};
pub use units::MassUnit;
