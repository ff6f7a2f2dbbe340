//! # Mass Units
//!
//! Declarations report net mass in kilograms, grams or tonnes. Everything
//! downstream of normalization works in kilograms, so conversion happens
//! exactly once, here.

use serde::{Deserialize, Serialize};

/// A recognized mass unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MassUnit {
    /// Kilograms. The canonical unit.
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    /// Grams.
    #[serde(rename = "g")]
    Grams,
    /// Metric tonnes.
    #[serde(rename = "t")]
    Tonnes,
}

impl MassUnit {
    /// Recognize a unit tag from a source cell.
    ///
    /// Matching is case-insensitive after trimming. Accepted tags are `kg`,
    /// `g`, `t`, `tonne` and `tonnes`. Anything else, including an empty
    /// cell, yields `None`.
    pub fn parse_tag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "kg" => Some(Self::Kilograms),
            "g" => Some(Self::Grams),
            "t" | "tonne" | "tonnes" => Some(Self::Tonnes),
            _ => None,
        }
    }

    /// Resolve the effective unit for one row.
    ///
    /// Fallback chain: the row's own unit tag if recognized, then the
    /// declared default, then kilograms.
    pub fn resolve(row_tag: Option<&str>, declared_default: Option<MassUnit>) -> Self {
        row_tag
            .and_then(Self::parse_tag)
            .or(declared_default)
            .unwrap_or_default()
    }

    /// Convert a value in this unit to kilograms.
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            Self::Kilograms => value,
            Self::Grams => value / 1000.0,
            Self::Tonnes => value * 1000.0,
        }
    }

    /// Returns the short unit tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Grams => "g",
            Self::Tonnes => "t",
        }
    }
}

impl std::fmt::Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_kilograms() {
        assert_eq!(MassUnit::Tonnes.to_kg(1.5), 1500.0);
        assert_eq!(MassUnit::Grams.to_kg(1200.0), 1.2);
        assert_eq!(MassUnit::Kilograms.to_kg(42.125), 42.125);
    }

    #[test]
    fn parse_tag_is_case_insensitive() {
        assert_eq!(MassUnit::parse_tag(" KG "), Some(MassUnit::Kilograms));
        assert_eq!(MassUnit::parse_tag("G"), Some(MassUnit::Grams));
        assert_eq!(MassUnit::parse_tag("Tonnes"), Some(MassUnit::Tonnes));
        assert_eq!(MassUnit::parse_tag("tonne"), Some(MassUnit::Tonnes));
        assert_eq!(MassUnit::parse_tag("lb"), None);
        assert_eq!(MassUnit::parse_tag(""), None);
    }

    #[test]
    fn resolve_prefers_row_then_default_then_kg() {
        assert_eq!(
            MassUnit::resolve(Some("t"), Some(MassUnit::Grams)),
            MassUnit::Tonnes
        );
        assert_eq!(
            MassUnit::resolve(Some("bushel"), Some(MassUnit::Grams)),
            MassUnit::Grams
        );
        assert_eq!(MassUnit::resolve(None, Some(MassUnit::Tonnes)), MassUnit::Tonnes);
        assert_eq!(MassUnit::resolve(Some(""), None), MassUnit::Kilograms);
        assert_eq!(MassUnit::resolve(None, None), MassUnit::Kilograms);
    }

    #[test]
    fn serde_uses_short_tags() {
        assert_eq!(serde_json::to_string(&MassUnit::Tonnes).unwrap(), "\"t\"");
        let g: MassUnit = serde_json::from_str("\"g\"").unwrap();
        assert_eq!(g, MassUnit::Grams);
    }
}
