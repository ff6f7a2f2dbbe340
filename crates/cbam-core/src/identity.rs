//! # Declaration Identifier Newtypes
//!
//! Validated wrappers for the free-text fields of a customs declaration.
//! Each constructor normalizes the raw cell first and then checks the
//! normalized form, so `Eori::parse(" de123 ")` and `Eori::parse("DE123")`
//! produce the same value.
//!
//! Lengths are counted in characters, not bytes.

use serde::{Deserialize, Serialize};

use crate::error::CbamError;

/// Importer EORI number. Trimmed, uppercased, 3 to 20 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Eori(String);

/// Combined-nomenclature goods code. All non-alphanumeric characters are
/// stripped and the rest uppercased; 4 to 20 characters remain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CnCode(String);

/// ISO 3166-1 alpha-2 country of origin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

/// Customs procedure code. Trimmed, uppercased, 1 to 20 characters.
///
/// Internal whitespace is preserved: `"40 00"` stays `"40 00"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcedureCode(String);

fn check_length(
    kind: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), CbamError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(CbamError::InvalidIdentifier {
            kind,
            reason: format!("expected {min} to {max} characters, got {len}"),
        });
    }
    Ok(())
}

impl Eori {
    /// Normalize and validate a raw EORI cell.
    pub fn parse(raw: &str) -> Result<Self, CbamError> {
        let normalized = raw.trim().to_uppercase();
        check_length("EORI", &normalized, 3, 20)?;
        Ok(Self(normalized))
    }
}

impl CnCode {
    /// Strip separators (dots, spaces, dashes) and uppercase.
    ///
    /// This is the normalization applied before validation; it never fails.
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Normalize and validate a raw CN code cell.
    pub fn parse(raw: &str) -> Result<Self, CbamError> {
        let normalized = Self::normalize(raw);
        check_length("CN code", &normalized, 4, 20)?;
        Ok(Self(normalized))
    }
}

impl CountryCode {
    /// Normalize and validate a raw origin country cell.
    pub fn parse(raw: &str) -> Result<Self, CbamError> {
        let normalized = raw.trim().to_uppercase();
        let is_iso2 = normalized.len() == 2 && normalized.bytes().all(|b| b.is_ascii_uppercase());
        if !is_iso2 {
            return Err(CbamError::InvalidIdentifier {
                kind: "country code",
                reason: format!("{normalized:?} is not two letters A-Z"),
            });
        }
        Ok(Self(normalized))
    }
}

impl ProcedureCode {
    /// Normalize and validate a raw procedure code cell.
    pub fn parse(raw: &str) -> Result<Self, CbamError> {
        let normalized = raw.trim().to_uppercase();
        check_length("procedure code", &normalized, 1, 20)?;
        Ok(Self(normalized))
    }
}

macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            /// Access the normalized string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CbamError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_newtype!(Eori);
string_newtype!(CnCode);
string_newtype!(CountryCode);
string_newtype!(ProcedureCode);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eori_trims_and_uppercases() {
        let eori = Eori::parse("  de1234567890 ").unwrap();
        assert_eq!(eori.as_str(), "DE1234567890");
    }

    #[test]
    fn eori_length_bounds() {
        assert!(Eori::parse("DE").is_err());
        assert!(Eori::parse("DE1").is_ok());
        assert!(Eori::parse(&"D".repeat(20)).is_ok());
        assert!(Eori::parse(&"D".repeat(21)).is_err());
    }

    #[test]
    fn cn_code_strips_separators() {
        let code = CnCode::parse("7208.10-00").unwrap();
        assert_eq!(code.as_str(), "72081000");
        assert_eq!(CnCode::normalize("ex 72 08"), "EX7208");
    }

    #[test]
    fn cn_code_too_short_after_stripping() {
        assert!(CnCode::parse("7.2.0").is_err());
        assert!(CnCode::parse("").is_err());
    }

    #[test]
    fn country_code_requires_two_letters() {
        assert_eq!(CountryCode::parse(" cn ").unwrap().as_str(), "CN");
        assert!(CountryCode::parse("ZZZ").is_err());
        assert!(CountryCode::parse("1A").is_err());
        assert!(CountryCode::parse("").is_err());
    }

    #[test]
    fn procedure_code_keeps_inner_space() {
        assert_eq!(ProcedureCode::parse("40 00").unwrap().as_str(), "40 00");
        assert!(ProcedureCode::parse("   ").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: Eori = serde_json::from_str("\"de123\"").unwrap();
        assert_eq!(ok.as_str(), "DE123");
        let bad: Result<Eori, _> = serde_json::from_str("\"x\"");
        assert!(bad.is_err());
    }

    #[test]
    fn serde_serializes_as_plain_string() {
        let code = CnCode::parse("7208").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"7208\"");
    }

    proptest! {
        #[test]
        fn cn_code_normalization_is_idempotent(raw in "[0-9a-zA-Z .\\-]{0,24}") {
            let once = CnCode::normalize(&raw);
            prop_assert_eq!(CnCode::normalize(&once), once.clone());
            prop_assert!(once.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }

        #[test]
        fn parsed_cn_code_round_trips(digits in "[0-9]{4,20}") {
            let code = CnCode::parse(&digits).unwrap();
            prop_assert_eq!(code.as_str(), digits.as_str());
        }
    }
}
