//! # Row Normalizer
//!
//! Parses a delimited customs file with a header row and maps each data row
//! onto the canonical fields named by a [`SourceMapping`].
//!
//! Per-field rules, applied after trimming:
//!
//! | Field | Normalization | Accepts |
//! |---|---|---|
//! | importer EORI | uppercase | 3–20 chars |
//! | CN code | drop non-alphanumerics, uppercase | 4–20 chars |
//! | net mass | `,` read as decimal point | finite, > 0 |
//! | origin | uppercase | two letters A–Z |
//! | procedure code | uppercase | 1–20 chars |
//! | declaration date | none | `YYYY-MM-DD`, real day |
//!
//! Mass is converted to kilograms using the row's unit tag, the mapping's
//! default unit, or kilograms, in that order of preference.

use cbam_core::{
    CbamError, CnCode, CountryCode, DeclarationDate, Eori, MassUnit, ParseError, ParseField,
    ParseResult, ParsedImportLine, ProcedureCode, SourceMapping,
};
use csv::{ReaderBuilder, StringRecord, Trim};

const MSG_IMPORTER: &str = "Invalid importer EORI.";
const MSG_CN_CODE: &str = "Invalid CN code.";
const MSG_MASS: &str = "net_mass_kg must be a positive number.";
const MSG_ORIGIN: &str = "origin_country must be an ISO-2 uppercase code.";
const MSG_PROCEDURE: &str = "Invalid procedure code.";
const MSG_DATE: &str = "declaration_date must be formatted as YYYY-MM-DD.";

/// Normalize a delimited customs file against a column mapping.
///
/// If the mapping leaves any required field unbound, returns one row-0
/// error per unbound field and no rows, without reading `input`.
///
/// Otherwise every data row is processed independently. Blank lines are
/// skipped and rows may have fewer or more cells than the header. Row
/// numbers are 1-based with the header as row 1.
///
/// The returned rows are only usable if `errors` is empty; see
/// [`ParseResult::into_accepted`].
pub fn parse_and_normalize_csv(input: impl AsRef<[u8]>, mapping: &SourceMapping) -> ParseResult {
    let missing = mapping.missing_required_fields();
    if !missing.is_empty() {
        tracing::debug!(missing = missing.len(), "source mapping incomplete, rows not read");
        return ParseResult {
            rows: Vec::new(),
            errors: missing.into_iter().map(ParseError::missing_mapping).collect(),
        };
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_ref());

    let columns = match reader.headers() {
        Ok(headers) => ColumnIndex::resolve(headers, mapping),
        Err(e) => {
            return ParseResult {
                rows: Vec::new(),
                errors: vec![ParseError {
                    row: 1,
                    field: ParseField::Row,
                    message: format!("Unreadable header row: {e}"),
                }],
            }
        }
    };

    let mut result = ParseResult::default();
    for (idx, record) in reader.records().enumerate() {
        let row_number = idx + 2;
        match record {
            Ok(record) => match normalize_row(&record, &columns, mapping, row_number) {
                Ok(line) => result.rows.push(line),
                Err(mut errors) => result.errors.append(&mut errors),
            },
            Err(e) => result.errors.push(ParseError {
                row: row_number,
                field: ParseField::Row,
                message: format!("Unreadable row: {e}"),
            }),
        }
    }

    tracing::debug!(
        rows = result.rows.len(),
        errors = result.errors.len(),
        "normalized customs file"
    );
    result
}

/// Parse a raw mass cell.
///
/// The first `,` is treated as the decimal separator. The value must be a
/// finite number greater than zero.
///
/// The whole cell must be numeric: a trailing unit suffix such as
/// `"1200 kg"` or `"12kg"` is rejected rather than truncated to its numeric
/// prefix. Units belong in the mapped unit column. Exponent notation
/// (`"1e3"`) is accepted.
pub fn parse_mass(raw: &str) -> Result<f64, CbamError> {
    let candidate = raw.trim().replacen(',', ".", 1);
    let value: f64 = candidate
        .parse()
        .map_err(|_| CbamError::InvalidMass(format!("{raw:?} is not a number")))?;
    ensure_positive(value)
}

fn ensure_positive(value: f64) -> Result<f64, CbamError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CbamError::InvalidMass(format!("{value} is not a finite positive number")))
    }
}

/// Header positions of the mapped columns.
struct ColumnIndex {
    importer_eori: Option<usize>,
    cn_code: Option<usize>,
    net_mass_kg: Option<usize>,
    origin_country: Option<usize>,
    declaration_date: Option<usize>,
    procedure_code: Option<usize>,
    mass_unit: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, mapping: &SourceMapping) -> Self {
        Self {
            importer_eori: find_column(headers, &mapping.importer_eori),
            cn_code: find_column(headers, &mapping.cn_code),
            net_mass_kg: find_column(headers, &mapping.net_mass_kg),
            origin_country: find_column(headers, &mapping.origin_country),
            declaration_date: find_column(headers, &mapping.declaration_date),
            procedure_code: find_column(headers, &mapping.procedure_code),
            mass_unit: mapping
                .mass_unit
                .as_deref()
                .and_then(|name| find_column(headers, name)),
        }
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    let name = name.trim();
    headers.iter().position(|h| h == name)
}

fn cell(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).unwrap_or("")
}

/// Record a failed field check and pass the value through as an `Option`.
fn check<T>(
    errors: &mut Vec<ParseError>,
    row: usize,
    field: ParseField,
    message: &str,
    outcome: Result<T, CbamError>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::trace!(row, %field, error = %e, "field rejected");
            errors.push(ParseError {
                row,
                field,
                message: message.to_string(),
            });
            None
        }
    }
}

fn normalize_row(
    record: &StringRecord,
    columns: &ColumnIndex,
    mapping: &SourceMapping,
    row: usize,
) -> Result<ParsedImportLine, Vec<ParseError>> {
    let mut errors = Vec::new();

    let unit = resolve_unit(record, columns, mapping, row);
    let mass = parse_mass(cell(record, columns.net_mass_kg))
        .and_then(|value| ensure_positive(unit.to_kg(value)));

    let importer_eori = check(
        &mut errors,
        row,
        ParseField::ImporterEori,
        MSG_IMPORTER,
        Eori::parse(cell(record, columns.importer_eori)),
    );
    let cn_code = check(
        &mut errors,
        row,
        ParseField::CnCode,
        MSG_CN_CODE,
        CnCode::parse(cell(record, columns.cn_code)),
    );
    let net_mass_kg = check(&mut errors, row, ParseField::NetMassKg, MSG_MASS, mass);
    let origin_country = check(
        &mut errors,
        row,
        ParseField::OriginCountry,
        MSG_ORIGIN,
        CountryCode::parse(cell(record, columns.origin_country)),
    );
    let procedure_code = check(
        &mut errors,
        row,
        ParseField::ProcedureCode,
        MSG_PROCEDURE,
        ProcedureCode::parse(cell(record, columns.procedure_code)),
    );
    let declaration_date = check(
        &mut errors,
        row,
        ParseField::DeclarationDate,
        MSG_DATE,
        DeclarationDate::parse_strict(cell(record, columns.declaration_date)),
    );

    match (
        importer_eori,
        cn_code,
        net_mass_kg,
        origin_country,
        procedure_code,
        declaration_date,
    ) {
        (
            Some(importer_eori),
            Some(cn_code),
            Some(net_mass_kg),
            Some(origin_country),
            Some(procedure_code),
            Some(declaration_date),
        ) => Ok(ParsedImportLine {
            importer_eori,
            cn_code,
            net_mass_kg,
            origin_country,
            declaration_date,
            procedure_code,
            source_row_number: row,
        }),
        _ => Err(errors),
    }
}

fn resolve_unit(
    record: &StringRecord,
    columns: &ColumnIndex,
    mapping: &SourceMapping,
    row: usize,
) -> MassUnit {
    let tag = columns.mass_unit.map(|i| cell(record, Some(i)));
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        if MassUnit::parse_tag(tag).is_none() {
            tracing::warn!(row, tag, "unrecognized mass unit, using fallback");
        }
    }
    MassUnit::resolve(tag, mapping.default_mass_unit)
}
