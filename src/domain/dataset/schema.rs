// ============================================================
// SCHEMA SNIFFING
// ============================================================
// Explicit column typing from a sample of raw records

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Cell, ColumnKind};

/// Strings read as missing values, matching the pandas defaults
const NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column names and kinds of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,

    /// Number of records the kinds were inferred from
    pub sampled_rows: usize,
}

impl Schema {
    /// Infer a kind per column from the first `sample_rows` records.
    ///
    /// Each column gets the narrowest kind every non-null sampled value
    /// parses as. Columns with no non-null sample are `Float`.
    pub fn sniff(headers: &[String], records: &[Vec<String>], sample_rows: usize) -> Self {
        let sample = &records[..records.len().min(sample_rows)];

        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let kind = sample
                    .iter()
                    .filter_map(|record| record.get(idx))
                    .filter(|value| !is_null_marker(value))
                    .map(|value| infer_kind(value))
                    .reduce(ColumnKind::widen)
                    .unwrap_or(ColumnKind::Float);
                FieldSchema {
                    name: name.clone(),
                    kind,
                }
            })
            .collect();

        Self {
            fields,
            sampled_rows: sample.len(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS.contains(&value.trim())
}

/// Narrowest kind a single non-null raw value parses as
pub fn infer_kind(value: &str) -> ColumnKind {
    let value = value.trim();
    if value.parse::<i64>().is_ok() {
        ColumnKind::Integer
    } else if parse_float(value).is_some() {
        ColumnKind::Float
    } else if parse_bool(value).is_some() {
        ColumnKind::Boolean
    } else if parse_datetime(value).is_some() {
        ColumnKind::DateTime
    } else {
        ColumnKind::Text
    }
}

/// Convert a raw value to a cell of `kind`.
///
/// Returns `None` when the value does not conform to `kind`. Null markers
/// always convert to `Cell::Null`.
pub fn parse_value(value: &str, kind: ColumnKind) -> Option<Cell> {
    if is_null_marker(value) {
        return Some(Cell::Null);
    }
    let trimmed = value.trim();
    match kind {
        ColumnKind::Integer => trimmed.parse::<i64>().ok().map(Cell::Int),
        ColumnKind::Float => parse_float(trimmed).map(Cell::Float),
        ColumnKind::Boolean => parse_bool(trimmed).map(Cell::Bool),
        ColumnKind::DateTime => parse_datetime(trimmed).map(Cell::DateTime),
        ColumnKind::Text => Some(Cell::Text(value.to_string())),
    }
}

fn parse_float(value: &str) -> Option<f64> {
    // Rust accepts "inf"/"infinity" spelled any way; keep words out of float columns
    if value.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    value.parse::<f64>().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
