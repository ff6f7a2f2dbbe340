//! # cbam-cli: CLI for the CBAM Compliance Engine
//!
//! Provides the `cbam` command-line interface. Every subcommand reads its
//! inputs from files, calls into the engine crates, and writes JSON.
//!
//! ## Subcommands
//!
//! - `cbam ingest`: Normalize a customs CSV export and classify its lines.
//! - `cbam reclassify`: Re-run classification of stored lines against a new rule set.
//! - `cbam threshold`: Per-year snapshots and threshold crossing alerts.
//! - `cbam reminders`: Upcoming regulatory deadlines.
//! - `cbam pack`: Build or verify a submission pack archive.
//!
//! ```bash
//! cbam ingest export.csv --mapping mapping.json --rules rules.yaml --out lines.json
//! cbam threshold lines.json --importer imp_1 --previous previous.json
//! cbam pack build --importer imp_1 --application app_1 --doc report.pdf --out pack.zip
//! cbam pack verify pack.zip --expect <sha256>
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` operational error, `2` the input was read but rejected
//! (validation errors, failed pack verification).

pub mod config;
pub mod ingest;
pub mod pack;
pub mod reminders;
pub mod threshold;

use std::path::Path;

use anyhow::{Context, Result};
use cbam_rules::RuleSet;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Exit code for inputs that were read but rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Load a rule set; `.json` files are read as JSON, anything else as YAML.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule set {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rules = if is_json {
        RuleSet::from_json_str(&text)
    } else {
        RuleSet::from_yaml_str(&text)
    }
    .with_context(|| format!("invalid rule set {}", path.display()))?;
    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded rule set");
    Ok(rules)
}

/// Pretty-print `value` as JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES_YAML: &str = "\
- id: steel
  cn_code_pattern: \"72\"
  match_type: prefix
  active: true
  effective_from: 2026-01-01
  category: iron_steel
";

    #[test]
    fn load_rules_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, RULES_YAML).unwrap();
        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.rules()[0].id, "steel");
    }

    #[test]
    fn load_rules_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.JSON");
        std::fs::write(
            &path,
            r#"[{"id":"a","cn_code_pattern":"7208","match_type":"exact","active":true,"effective_from":"2026-01-01","category":"iron_steel"}]"#,
        )
        .unwrap();
        assert_eq!(load_rules(&path).unwrap().len(), 1);
    }

    #[test]
    fn load_rules_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "- id: x\n  match_type: fuzzy\n").unwrap();
        let err = load_rules(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.yaml"));
    }

    #[test]
    fn read_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<serde_json::Value>(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{err}").contains("failed to read"));
    }

    #[test]
    fn write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&vec![1, 2, 3], Some(&path)).unwrap();
        let back: Vec<i32> = read_json(&path).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
