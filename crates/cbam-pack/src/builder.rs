//! # Pack Builder

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use cbam_core::{sha256_bytes, ContentDigest, Timestamp};
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackError;
use crate::manifest::{document_path, Manifest, ManifestDocument, SummaryValue, MANIFEST_ENTRY};

/// A supporting document to include in a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDocument {
    pub filename: String,
    pub content_type: String,
    #[serde(default)]
    pub content: Vec<u8>,
    /// Precomputed lowercase hex SHA-256. Computed from `content` when absent.
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Everything needed to assemble a pack.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPackInput {
    pub importer_id: String,
    pub auth_application_id: String,
    pub generated_at: Timestamp,
    pub summary: BTreeMap<String, SummaryValue>,
    pub documents: Vec<PackDocument>,
}

/// The assembled archive and its two digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPackOutput {
    pub archive: Vec<u8>,
    /// SHA-256 of the manifest JSON text as stored in the archive.
    pub manifest_sha256: ContentDigest,
    /// SHA-256 of the complete archive bytes.
    pub package_sha256: ContentDigest,
}

/// Assemble a submission pack.
///
/// Entries are written uncompressed in a fixed order: the manifest, then
/// each document at [`document_path`]. A caller-supplied digest is trusted
/// as given once it parses; it is not checked against the content here.
///
/// # Errors
///
/// [`PackError::InvalidDigest`] if a precomputed digest is malformed, or an
/// archive/serialization error.
pub fn build_submission_pack(
    input: &SubmissionPackInput,
) -> Result<SubmissionPackOutput, PackError> {
    let documents = input
        .documents
        .iter()
        .map(|doc| {
            Ok(ManifestDocument {
                filename: doc.filename.clone(),
                content_type: doc.content_type.clone(),
                sha256: document_digest(doc)?,
            })
        })
        .collect::<Result<Vec<_>, PackError>>()?;

    let manifest = Manifest {
        importer_id: input.importer_id.clone(),
        auth_application_id: input.auth_application_id.clone(),
        generated_at: input.generated_at.to_iso8601(),
        summary: input.summary.clone(),
        documents,
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(MANIFEST_ENTRY, entry_options(&input.generated_at))?;
    writer.write_all(manifest_json.as_bytes())?;
    for (idx, doc) in input.documents.iter().enumerate() {
        writer.start_file(
            document_path(idx + 1, &doc.filename),
            entry_options(&input.generated_at),
        )?;
        writer.write_all(&doc.content)?;
    }
    let archive = writer.finish()?.into_inner();

    let output = SubmissionPackOutput {
        manifest_sha256: sha256_bytes(manifest_json.as_bytes()),
        package_sha256: sha256_bytes(&archive),
        archive,
    };
    tracing::debug!(
        importer = %input.importer_id,
        documents = input.documents.len(),
        bytes = output.archive.len(),
        package_sha256 = %output.package_sha256,
        "submission pack assembled"
    );
    Ok(output)
}

fn document_digest(doc: &PackDocument) -> Result<ContentDigest, PackError> {
    match &doc.sha256 {
        Some(hex) => ContentDigest::from_hex(hex).map_err(|e| PackError::InvalidDigest {
            filename: doc.filename.clone(),
            reason: e.to_string(),
        }),
        None => Ok(sha256_bytes(&doc.content)),
    }
}

/// Stored entries stamped with the pack's generation time.
fn entry_options(generated_at: &Timestamp) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip_time(generated_at))
}

/// Zip entry times cover 1980..=2107; anything outside falls back to the
/// format's epoch.
fn zip_time(ts: &Timestamp) -> zip::DateTime {
    let dt = ts.as_datetime();
    u16::try_from(dt.year())
        .ok()
        .and_then(|year| {
            zip::DateTime::from_date_and_time(
                year,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}
