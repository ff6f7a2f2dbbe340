//! # Pack Verification
//!
//! Re-reads an archive produced by [`crate::build_submission_pack`] and checks
//! it against its own manifest: every listed document must be present at its
//! expected path with a matching SHA-256, and nothing else may be in the
//! archive. Problems are collected rather than failing on the first one.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use cbam_core::{sha256_bytes, ContentDigest};
use serde::Serialize;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::PackError;
use crate::manifest::{document_path, Manifest, MANIFEST_ENTRY};

/// A single integrity problem found in a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackIssue {
    /// The archive bytes do not hash to the expected package digest.
    PackageDigestMismatch {
        expected: ContentDigest,
        actual: ContentDigest,
    },
    /// A document's bytes do not hash to the manifest's digest.
    DocumentDigestMismatch {
        path: String,
        expected: ContentDigest,
        actual: ContentDigest,
    },
    /// A manifest document has no archive entry.
    MissingDocument { path: String },
    /// An archive entry the manifest does not list.
    UnexpectedEntry { path: String },
}

impl std::fmt::Display for PackIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PackageDigestMismatch { expected, actual } => {
                write!(f, "package digest mismatch: expected {expected}, got {actual}")
            }
            Self::DocumentDigestMismatch {
                path,
                expected,
                actual,
            } => write!(f, "{path}: digest mismatch: expected {expected}, got {actual}"),
            Self::MissingDocument { path } => write!(f, "{path}: missing from archive"),
            Self::UnexpectedEntry { path } => write!(f, "{path}: not listed in manifest"),
        }
    }
}

/// Outcome of verifying a pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackVerification {
    pub manifest: Manifest,
    pub manifest_sha256: ContentDigest,
    pub package_sha256: ContentDigest,
    pub issues: Vec<PackIssue>,
}

impl PackVerification {
    /// `true` when no issues were found.
    pub fn is_intact(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Verify a submission pack archive.
///
/// When `expected_package` is given, the archive digest is compared to it.
///
/// # Errors
///
/// Returns an error only when the archive cannot be read at all or has no
/// parseable manifest. Content problems are reported as [`PackIssue`]s.
pub fn verify_submission_pack(
    archive: &[u8],
    expected_package: Option<&ContentDigest>,
) -> Result<PackVerification, PackError> {
    let package_sha256 = sha256_bytes(archive);
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    let manifest_text = {
        let mut entry = zip.by_name(MANIFEST_ENTRY).map_err(|e| match e {
            ZipError::FileNotFound => PackError::MissingManifest,
            other => PackError::Archive(other),
        })?;
        let mut text = String::new();
        entry.read_to_string(&mut text)?;
        text
    };
    let manifest: Manifest = serde_json::from_str(&manifest_text)?;

    let mut entries = BTreeMap::new();
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx)?;
        let name = entry.name().to_string();
        if name == MANIFEST_ENTRY || entry.is_dir() {
            continue;
        }
        let mut body = Vec::new();
        entry.read_to_end(&mut body)?;
        entries.insert(name, body);
    }

    let mut issues = Vec::new();
    if let Some(expected) = expected_package {
        if *expected != package_sha256 {
            issues.push(PackIssue::PackageDigestMismatch {
                expected: *expected,
                actual: package_sha256,
            });
        }
    }

    for (idx, doc) in manifest.documents.iter().enumerate() {
        let path = document_path(idx + 1, &doc.filename);
        match entries.remove(&path) {
            Some(body) => {
                let actual = sha256_bytes(&body);
                if actual != doc.sha256 {
                    issues.push(PackIssue::DocumentDigestMismatch {
                        path,
                        expected: doc.sha256,
                        actual,
                    });
                }
            }
            None => issues.push(PackIssue::MissingDocument { path }),
        }
    }
    issues.extend(
        entries
            .into_keys()
            .map(|path| PackIssue::UnexpectedEntry { path }),
    );

    if !issues.is_empty() {
        tracing::warn!(issues = issues.len(), "submission pack failed verification");
    }

    Ok(PackVerification {
        manifest_sha256: sha256_bytes(manifest_text.as_bytes()),
        package_sha256,
        manifest,
        issues,
    })
}
