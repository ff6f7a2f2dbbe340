//! # Pack Manifest
//!
//! The manifest's JSON keys are camelCase and its document list follows
//! input order, so entry `n` of `documents/` is manifest document `n`.

use std::collections::BTreeMap;

use cbam_core::ContentDigest;
use serde::{Deserialize, Serialize};

/// Archive path of the manifest.
pub const MANIFEST_ENTRY: &str = "manifest.json";

/// A scalar value in the manifest summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<&str> for SummaryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SummaryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SummaryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SummaryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SummaryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One document as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub filename: String,
    pub content_type: String,
    pub sha256: ContentDigest,
}

/// The manifest stored at [`MANIFEST_ENTRY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub importer_id: String,
    pub auth_application_id: String,
    /// ISO 8601 UTC, e.g. `2026-01-01T00:00:00Z`.
    pub generated_at: String,
    pub summary: BTreeMap<String, SummaryValue>,
    pub documents: Vec<ManifestDocument>,
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Archive path of the document at 1-based `position`.
pub fn document_path(position: usize, filename: &str) -> String {
    format!("documents/{position}-{}", sanitize_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_filename("doc.txt"), "doc.txt");
        assert_eq!(sanitize_filename("my report (v2).pdf"), "my_report__v2_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("Zertifikat_ä.pdf"), "Zertifikat__.pdf");
    }

    #[test]
    fn document_path_encodes_position() {
        assert_eq!(document_path(1, "a b.pdf"), "documents/1-a_b.pdf");
        assert_eq!(document_path(12, "x"), "documents/12-x");
    }

    #[test]
    fn summary_values_serialize_untagged() {
        let summary = BTreeMap::from([
            ("count".to_string(), SummaryValue::from(3i64)),
            ("draft".to_string(), SummaryValue::from(true)),
            ("status".to_string(), SummaryValue::from("submitted")),
        ]);
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"count":3,"draft":true,"status":"submitted"}"#);
        let back: BTreeMap<String, SummaryValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn manifest_keys_are_camel_case() {
        let manifest = Manifest {
            importer_id: "imp_1".into(),
            auth_application_id: "app_1".into(),
            generated_at: "2026-01-01T00:00:00Z".into(),
            summary: BTreeMap::new(),
            documents: vec![ManifestDocument {
                filename: "doc.txt".into(),
                content_type: "text/plain".into(),
                sha256: cbam_core::sha256_bytes(b"hello"),
            }],
        };
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["importerId"], "imp_1");
        assert_eq!(value["authApplicationId"], "app_1");
        assert_eq!(value["documents"][0]["contentType"], "text/plain");
        assert_eq!(
            value["documents"][0]["sha256"],
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
