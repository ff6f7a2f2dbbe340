//! # cbam-ingest: Customs File Normalization
//!
//! Converts a delimited customs export (header row plus data rows) and a
//! [`SourceMapping`](cbam_core::SourceMapping) into validated
//! [`ParsedImportLine`](cbam_core::ParsedImportLine)s.
//!
//! Validation is per row and per field. A row is emitted only if every
//! field passes; otherwise it contributes one [`ParseError`](cbam_core::ParseError)
//! per failing field and nothing else. A mapping with unbound required
//! fields aborts before any row is read.
//!
//! ## Crate Policy
//!
//! - Depends only on `cbam-core` internally.
//! - Reads from in-memory buffers only; no filesystem access.

pub mod normalize;

pub use normalize::{parse_and_normalize_csv, parse_mass};
