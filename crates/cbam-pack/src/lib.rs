//! # cbam-pack: Submission Packs
//!
//! A submission pack is the audit archive handed to the authority with an
//! authorisation application. It contains:
//!
//! - `manifest.json`: importer, application, generation time, a free-form
//!   summary, and the SHA-256 of every document, pretty-printed JSON.
//! - `documents/{n}-{name}`: each document's raw bytes, numbered from 1 in
//!   input order, with the file name reduced to `[A-Za-z0-9._-]`.
//!
//! Two digests make the pack tamper-evident: one over the manifest text and
//! one over the complete archive bytes. [`verify_submission_pack`] recomputes
//! both and re-hashes every document.
//!
//! Entry timestamps are taken from the generation time, so the same input
//! always produces byte-identical archives.
//!
//! ## Manifest Format
//!
//! - `generatedAt` has seconds precision (`2026-01-01T00:00:00Z`), with no
//!   fractional part.
//! - `summary` keys are written in sorted order, not insertion order.
//!
//! Packs produced by systems that write milliseconds or preserve key
//! insertion order therefore have different manifest bytes and digests for
//! the same logical content.
//!
//! ## Crate Policy
//!
//! - Works on in-memory buffers only. Storing or uploading the archive is
//!   the caller's concern.

pub mod builder;
pub mod error;
pub mod manifest;
pub mod verify;

pub use builder::{
    build_submission_pack, PackDocument, SubmissionPackInput, SubmissionPackOutput,
};
pub use error::PackError;
pub use manifest::{
    document_path, sanitize_filename, Manifest, ManifestDocument, SummaryValue, MANIFEST_ENTRY,
};
pub use verify::{verify_submission_pack, PackIssue, PackVerification};
