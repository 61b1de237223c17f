//! Spreadsheet Reader: turns the `Empleados` sheet of an `.xlsx` upload into
//! `ParsedRow`s.
//!
//! Columns are read by position (fixed 14-column layout). Row 1 is the header.
//! Dates and decimals follow the configured `ParsePolicy`:
//! - `Lenient`: unparseable text silently becomes 0001-01-01 / 0.
//! - `Strict`: unparseable non-blank text aborts the read with `ImportError::InvalidCell`.

use std::io::Cursor;
use std::str::FromStr;

use calamine::{open_workbook_from_rs, Data, DataType, Range, Reader, Xlsx};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

pub const SHEET_NAME: &str = "Empleados";

/// Expected header row, in column order.
pub const HEADERS: [&str; 14] = [
    "Documento",
    "Nombres",
    "Apellidos",
    "FechaNacimiento",
    "Direccion",
    "Telefono",
    "Email",
    "Cargo",
    "Salario",
    "FechaIngreso",
    "Estado",
    "NivelEducativo",
    "PerfilProfesional",
    "Departamento",
];

// Day-first formats are tried before the ISO fallback.
const LOCALE_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y"];
const LOCALE_DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No se pudo leer el archivo Excel: {0}")]
    Workbook(String),

    #[error("No se encontró la hoja '{0}' en el archivo Excel")]
    MissingSheet(String),

    #[error("Valor inválido '{value}' en la fila {row}, columna {column}")]
    InvalidCell {
        row: u32,
        column: &'static str,
        value: String,
    },

    #[error("Política de lectura desconocida: '{0}'")]
    UnknownPolicy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for ParsePolicy {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ParsePolicy::Lenient),
            "strict" => Ok(ParsePolicy::Strict),
            other => Err(ImportError::UnknownPolicy(other.to_string())),
        }
    }
}

/// The raw fields of one data row. Lives only for the duration of an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub job_title: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub status: String,
    pub education_level: String,
    pub professional_profile: String,
    pub department: String,
}

impl ParsedRow {
    fn is_identifiable(&self) -> bool {
        !self.document.is_empty() && !self.first_name.is_empty() && !self.last_name.is_empty()
    }
}

/// The value a date cell takes when nothing could be parsed.
pub fn epoch_min() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetReader {
    policy: ParsePolicy,
}

impl SpreadsheetReader {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    /// Reads every data row. Rows without document, first name or last name
    /// are dropped without being reported.
    pub fn read(&self, bytes: &[u8]) -> Result<Vec<ParsedRow>, ImportError> {
        let range = open_sheet(bytes)?;
        let Some((last_row, _)) = range.end() else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for row in 1..=last_row {
            let parsed = self.parse_row(&range, row)?;
            if parsed.is_identifiable() {
                rows.push(parsed);
            }
        }
        Ok(rows)
    }

    /// Checks that the sheet exists and its 14 header cells match, ignoring case.
    pub fn validate_structure(bytes: &[u8]) -> bool {
        let Ok(range) = open_sheet(bytes) else {
            return false;
        };
        HEADERS
            .iter()
            .enumerate()
            .all(|(col, expected)| cell_text(&range, 0, col as u32).eq_ignore_ascii_case(expected))
    }

    fn parse_row(&self, range: &Range<Data>, row: u32) -> Result<ParsedRow, ImportError> {
        let text = |col: u32| cell_text(range, row, col);
        // Spreadsheet rows are 1-based in messages.
        let sheet_row = row + 1;

        Ok(ParsedRow {
            document: text(0),
            first_name: text(1),
            last_name: text(2),
            birth_date: self.date(&text(3), sheet_row, HEADERS[3])?,
            address: text(4),
            phone: text(5),
            email: text(6),
            job_title: text(7),
            salary: self.decimal(&text(8), sheet_row, HEADERS[8])?,
            hire_date: self.date(&text(9), sheet_row, HEADERS[9])?,
            status: text(10),
            education_level: text(11),
            professional_profile: text(12),
            department: text(13),
        })
    }

    fn date(&self, text: &str, row: u32, column: &'static str) -> Result<NaiveDate, ImportError> {
        match parse_date(text) {
            Some(date) => Ok(date),
            None if text.is_empty() || self.policy == ParsePolicy::Lenient => Ok(epoch_min()),
            None => Err(ImportError::InvalidCell {
                row,
                column,
                value: text.to_string(),
            }),
        }
    }

    fn decimal(&self, text: &str, row: u32, column: &'static str) -> Result<Decimal, ImportError> {
        match parse_decimal(text) {
            Some(value) => Ok(value),
            None if text.is_empty() || self.policy == ParsePolicy::Lenient => Ok(Decimal::ZERO),
            None => Err(ImportError::InvalidCell {
                row,
                column,
                value: text.to_string(),
            }),
        }
    }
}

fn open_sheet(bytes: &[u8]) -> Result<Range<Data>, ImportError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsxError| ImportError::Workbook(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .into_iter()
        .find(|name| name.eq_ignore_ascii_case(SHEET_NAME))
        .ok_or_else(|| ImportError::MissingSheet(SHEET_NAME.to_string()))?;

    workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Workbook(e.to_string()))
}

/// Display text of a cell at an absolute (0-based) position, trimmed.
fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) | Some(Data::DateTimeIso(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => format_number(*f),
        Some(Data::Int(i)) => i.to_string(),
        Some(cell @ Data::DateTime(_)) => cell
            .as_date()
            .map(|d| d.format(ISO_DATE_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Whole numbers print without a fractional part, so numeric document cells
/// read back as `12345678` rather than `12345678.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    LOCALE_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .or_else(|| {
            LOCALE_DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDateTime::parse_from_str(text, ISO_DATETIME_FORMAT).ok().map(|dt| dt.date()))
        .or_else(|| NaiveDate::parse_from_str(text, ISO_DATE_FORMAT).ok())
}

pub fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_str(&text.replace(',', "")).ok())
}
