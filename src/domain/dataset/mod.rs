// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// In-memory table of named, typed columns
// No I/O, no async

mod cell;
mod schema;

pub use cell::{Cell, ColumnKind};
pub use schema::{infer_kind, is_null_marker, parse_value, FieldSchema, Schema};

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::error::{AppError, Result};

/// A named column of cells sharing one kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-null numeric values in row order
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_f64).collect()
    }

    /// Numeric values that can be placed on a chart axis
    pub fn finite_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_finite_f64).collect()
    }

    pub fn non_null_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_null()).count()
    }

    /// Fails with `AppError::ColumnType` unless the column is numeric
    pub fn require_numeric(&self) -> Result<()> {
        if self.kind.is_numeric() {
            Ok(())
        } else {
            Err(AppError::column_type(&self.name, self.kind, "a numeric column"))
        }
    }
}

/// Table parsed from an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    schema: Schema,
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset from a header row and raw string records.
    ///
    /// Kinds are sniffed from the first `sample_rows` records. Later values
    /// that do not fit widen their column instead of failing. Short records
    /// are padded with nulls, extra trailing values are dropped.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>, sample_rows: usize) -> Self {
        let headers = normalize_headers(headers);
        let sniffed = Schema::sniff(&headers, &records, sample_rows);

        let columns: Vec<Column> = sniffed
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let raw: Vec<&str> = records
                    .iter()
                    .map(|record| record.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                convert_column(&field.name, field.kind, &raw)
            })
            .collect();

        let schema = Schema {
            fields: columns
                .iter()
                .map(|c| FieldSchema {
                    name: c.name.clone(),
                    kind: c.kind,
                })
                .collect(),
            sampled_rows: sniffed.sampled_rows,
        };

        Self { schema, columns }
    }

    pub fn empty() -> Self {
        Self {
            schema: Schema {
                fields: Vec::new(),
                sampled_rows: 0,
            },
            columns: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind.is_numeric())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

fn convert_column(name: &str, sniffed: ColumnKind, raw: &[&str]) -> Column {
    let mut kind = sniffed;
    loop {
        let converted: std::result::Result<Vec<Cell>, &str> = raw
            .iter()
            .map(|value| parse_value(value, kind).ok_or(*value))
            .collect();

        match converted {
            Ok(cells) => {
                return Column {
                    name: name.to_string(),
                    kind,
                    cells,
                }
            }
            Err(value) => {
                let widened = kind.widen(infer_kind(value));
                warn!(
                    column = %name,
                    from = %kind,
                    to = %widened,
                    value = %value,
                    "Value outside sniffed sample does not fit column kind, widening"
                );
                kind = widened;
            }
        }
    }
}

/// Fill blank headers and de-duplicate repeated names the way pandas does:
/// `""` at position 3 becomes `Unnamed: 3`, a second `a` becomes `a.1`.
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{}.{}", base, count);
        }
        seen.insert(name.clone(), 0);
        out.push(name);
    }

    out
}
