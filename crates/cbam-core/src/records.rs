//! # Canonical Import Records
//!
//! The data that flows between normalization, classification and
//! aggregation: the column mapping supplied with a customs file, the
//! validated line produced from each accepted row, and the field-level
//! errors produced for rejected rows.

use serde::{Deserialize, Serialize};

use crate::identity::{CnCode, CountryCode, Eori, ProcedureCode};
use crate::temporal::DeclarationDate;
use crate::units::MassUnit;

/// A field a [`ParseError`] can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseField {
    ImporterEori,
    CnCode,
    NetMassKg,
    OriginCountry,
    DeclarationDate,
    ProcedureCode,
    /// The row as a whole could not be decoded.
    Row,
}

impl ParseField {
    /// The canonical field name as it appears in mappings and error reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImporterEori => "importer_eori",
            Self::CnCode => "cn_code",
            Self::NetMassKg => "net_mass_kg",
            Self::OriginCountry => "origin_country",
            Self::DeclarationDate => "declaration_date",
            Self::ProcedureCode => "procedure_code",
            Self::Row => "row",
        }
    }
}

impl std::fmt::Display for ParseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six canonical fields every mapping must bind to a source column.
pub const REQUIRED_CANONICAL_FIELDS: [ParseField; 6] = [
    ParseField::ImporterEori,
    ParseField::CnCode,
    ParseField::NetMassKg,
    ParseField::OriginCountry,
    ParseField::DeclarationDate,
    ParseField::ProcedureCode,
];

/// Binds canonical fields to the column names of one source file.
///
/// Required fields default to empty when absent from a deserialized
/// document so that a missing binding is reported as a mapping error rather
/// than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceMapping {
    #[serde(default)]
    pub importer_eori: String,
    #[serde(default)]
    pub cn_code: String,
    #[serde(default)]
    pub net_mass_kg: String,
    #[serde(default)]
    pub origin_country: String,
    #[serde(default)]
    pub declaration_date: String,
    #[serde(default)]
    pub procedure_code: String,
    /// Optional column carrying a per-row mass unit tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_unit: Option<String>,
    /// Unit assumed when a row has no recognizable unit tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mass_unit: Option<MassUnit>,
}

impl SourceMapping {
    /// The source column bound to a required field. `None` for [`ParseField::Row`].
    pub fn column_for(&self, field: ParseField) -> Option<&str> {
        let column = match field {
            ParseField::ImporterEori => &self.importer_eori,
            ParseField::CnCode => &self.cn_code,
            ParseField::NetMassKg => &self.net_mass_kg,
            ParseField::OriginCountry => &self.origin_country,
            ParseField::DeclarationDate => &self.declaration_date,
            ParseField::ProcedureCode => &self.procedure_code,
            ParseField::Row => return None,
        };
        Some(column.as_str())
    }

    /// Required fields whose binding is empty or whitespace, in canonical order.
    pub fn missing_required_fields(&self) -> Vec<ParseField> {
        REQUIRED_CANONICAL_FIELDS
            .iter()
            .copied()
            .filter(|field| self.column_for(*field).map_or(true, |c| c.trim().is_empty()))
            .collect()
    }
}

/// A validated row, not yet classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedImportLine {
    pub importer_eori: Eori,
    pub cn_code: CnCode,
    /// Net mass in kilograms. Always finite and positive.
    pub net_mass_kg: f64,
    pub origin_country: CountryCode,
    pub declaration_date: DeclarationDate,
    pub procedure_code: ProcedureCode,
    /// 1-based line in the source file; the header is row 1.
    pub source_row_number: usize,
}

/// A validated, classified import line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalImportLine {
    pub importer_eori: Eori,
    pub cn_code: CnCode,
    /// Net mass in kilograms. Always finite and positive.
    pub net_mass_kg: f64,
    pub origin_country: CountryCode,
    pub declaration_date: DeclarationDate,
    pub procedure_code: ProcedureCode,
    /// Whether the line counts toward the yearly threshold.
    pub cbam_scope: bool,
    /// Id of the rule that put the line in scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbam_rule_id: Option<String>,
    pub source_row_number: usize,
}

impl CanonicalImportLine {
    /// Attach a classification outcome to a parsed line.
    pub fn from_parsed(line: ParsedImportLine, cbam_rule_id: Option<String>) -> Self {
        Self {
            importer_eori: line.importer_eori,
            cn_code: line.cn_code,
            net_mass_kg: line.net_mass_kg,
            origin_country: line.origin_country,
            declaration_date: line.declaration_date,
            procedure_code: line.procedure_code,
            cbam_scope: cbam_rule_id.is_some(),
            cbam_rule_id,
            source_row_number: line.source_row_number,
        }
    }

    /// UTC calendar year of the declaration.
    pub fn year(&self) -> i32 {
        self.declaration_date.year()
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// Source row, or 0 for mapping-level errors.
    pub row: usize,
    pub field: ParseField,
    pub message: String,
}

impl ParseError {
    /// A mapping-level error for a required field with no bound column.
    pub fn missing_mapping(field: ParseField) -> Self {
        Self {
            row: 0,
            field,
            message: "Required field mapping is missing.".to_string(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} [{}]: {}", self.row, self.field, self.message)
    }
}

/// Outcome of normalizing one source file.
///
/// Callers must treat a non-empty `errors` list as rejecting the whole
/// file, even when `rows` is non-empty; see [`ParseResult::into_accepted`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub rows: Vec<ParsedImportLine>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Whether the file passes the all-or-nothing acceptance rule.
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    /// Apply the all-or-nothing acceptance rule: either every row, or every error.
    pub fn into_accepted(self) -> Result<Vec<ParsedImportLine>, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(self.rows)
        } else {
            Err(self.errors)
        }
    }
}
