//! # CN Code Rules
//!
//! A rule says "codes matching this pattern are in scope between these
//! dates". Rules are immutable once issued; a change is expressed as a new
//! rule plus a closed window on the old one, with an optional reason.

use std::collections::BTreeSet;

use cbam_core::DeclarationDate;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::matcher::{is_effective, match_cbam_rule};

/// How a rule's pattern is compared against a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMatchType {
    /// The code must equal the pattern.
    Exact,
    /// The code must start with the pattern.
    Prefix,
}

impl RuleMatchType {
    /// Returns the match type identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
        }
    }
}

impl std::fmt::Display for RuleMatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single effective-dated classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbamRule {
    pub id: String,
    pub cn_code_pattern: String,
    pub match_type: RuleMatchType,
    pub active: bool,
    pub effective_from: DeclarationDate,
    /// Last day the rule applies, inclusive. Open-ended when absent.
    #[serde(default)]
    pub effective_to: Option<DeclarationDate>,
    /// Goods category, e.g. `iron_steel`.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
}

impl CbamRule {
    /// The pattern with all whitespace removed and uppercased.
    ///
    /// This is the form compared against codes. Specificity ranking uses
    /// the pattern as written.
    pub fn normalized_pattern(&self) -> String {
        normalize_code(&self.cn_code_pattern)
    }

    /// Check the structural constraints on a single rule.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.normalized_pattern().is_empty() {
            return Err(RuleError::BlankPattern(self.id.clone()));
        }
        if let Some(to) = self.effective_to {
            if self.effective_from > to {
                return Err(RuleError::InvalidWindow {
                    id: self.id.clone(),
                    from: self.effective_from.to_iso_date(),
                    to: to.to_iso_date(),
                });
            }
        }
        Ok(())
    }
}

/// Strip whitespace and uppercase, the comparison form for codes and patterns.
pub(crate) fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// A validated, immutable snapshot of the rule table.
///
/// Order is irrelevant to matching. Ids are unique, patterns non-blank,
/// and every window has `effective_from <= effective_to`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<CbamRule>,
}

impl RuleSet {
    /// Validate and wrap a list of rules.
    pub fn new(rules: Vec<CbamRule>) -> Result<Self, RuleError> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleError::DuplicateId(rule.id.clone()));
            }
        }
        tracing::debug!(rules = rules.len(), "rule set loaded");
        Ok(Self { rules })
    }

    /// Parse a YAML sequence of rules.
    pub fn from_yaml_str(s: &str) -> Result<Self, RuleError> {
        let rules: Vec<CbamRule> = serde_yaml::from_str(s)?;
        Self::new(rules)
    }

    /// Parse a JSON array of rules.
    pub fn from_json_str(s: &str) -> Result<Self, RuleError> {
        let rules: Vec<CbamRule> = serde_json::from_str(s)?;
        Self::new(rules)
    }

    /// All rules, in load order.
    pub fn rules(&self) -> &[CbamRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Active rules whose window contains `date`.
    pub fn active_on(&self, date: DeclarationDate) -> impl Iterator<Item = &CbamRule> {
        self.rules.iter().filter(move |rule| is_effective(rule, date))
    }

    /// The most specific rule matching `cn_code` on `date`.
    pub fn match_code(&self, cn_code: &str, date: DeclarationDate) -> Option<&CbamRule> {
        match_cbam_rule(cn_code, date, &self.rules)
    }
}

impl AsRef<[CbamRule]> for RuleSet {
    fn as_ref(&self) -> &[CbamRule] {
        &self.rules
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rules = Vec::<CbamRule>::deserialize(deserializer)?;
        Self::new(rules).map_err(serde::de::Error::custom)
    }
}
