//! # Engine Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! threshold_kg: 50000
//! reminder_window_days: 30
//! rules: rules/cbam-2026.yaml
//! ```
//!
//! A relative `rules` path is resolved against the config file's directory.
//! Command-line flags take precedence over every value here.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cbam_threshold::{DEFAULT_REMINDER_WINDOW_DAYS, DEFAULT_THRESHOLD_KG};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Annual scoped-mass threshold in kilograms.
    pub threshold_kg: f64,
    /// Look-ahead window for deadline reminders, in days.
    pub reminder_window_days: i64,
    /// Default rule set file.
    pub rules: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_kg: DEFAULT_THRESHOLD_KG,
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            rules: None,
        }
    }
}

impl EngineConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        if !config.threshold_kg.is_finite() || config.threshold_kg <= 0.0 {
            bail!("threshold_kg must be a positive number, got {}", config.threshold_kg);
        }
        if config.reminder_window_days < 0 {
            bail!(
                "reminder_window_days must not be negative, got {}",
                config.reminder_window_days
            );
        }
        if let (Some(rules), Some(dir)) = (&config.rules, path.parent()) {
            if rules.is_relative() {
                config.rules = Some(dir.join(rules));
            }
        }

        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// `flag` if set, otherwise the configured threshold.
    pub fn threshold_or(&self, flag: Option<f64>) -> f64 {
        flag.unwrap_or(self.threshold_kg)
    }

    /// `flag` if set, otherwise the configured rule set path.
    pub fn rules_or(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.rules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("cbam.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn no_path_gives_defaults() {
        let config = EngineConfig::load(None).unwrap();
        assert_eq!(config.threshold_kg, 50_000.0);
        assert_eq!(config.reminder_window_days, 30);
        assert!(config.rules.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "threshold_kg: 1000\n");
        let config = EngineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.threshold_kg, 1000.0);
        assert_eq!(config.reminder_window_days, 30);
    }

    #[test]
    fn relative_rules_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "rules: rules/cbam.yaml\n");
        let config = EngineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.rules, Some(dir.path().join("rules/cbam.yaml")));
    }

    #[test]
    fn unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "threshold: 1000\n");
        assert!(EngineConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "threshold_kg: 0\n");
        let err = EngineConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err}").contains("threshold_kg"));
    }

    #[test]
    fn negative_window_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "reminder_window_days: -1\n");
        assert!(EngineConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = EngineConfig {
            rules: Some(PathBuf::from("a.yaml")),
            ..EngineConfig::default()
        };
        assert_eq!(config.threshold_or(Some(10.0)), 10.0);
        assert_eq!(config.threshold_or(None), 50_000.0);
        assert_eq!(
            config.rules_or(Some(Path::new("b.yaml"))),
            Some(PathBuf::from("b.yaml"))
        );
        assert_eq!(config.rules_or(None), Some(PathBuf::from("a.yaml")));
    }
}
