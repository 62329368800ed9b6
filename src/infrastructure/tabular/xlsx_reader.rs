// ============================================================
// XLSX READER
// ============================================================
// First worksheet of a workbook, cells converted to their text form

use std::path::Path;

use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};

use super::{RawTable, TableReader};
use crate::domain::error::{AppError, Result};

#[derive(Default)]
pub struct XlsxReader;

impl XlsxReader {
    pub fn new() -> Self {
        Self
    }

    /// Split a worksheet range into header row and records
    fn range_to_table(range: &Range<Data>) -> RawTable {
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

        let headers = match rows.next() {
            Some(headers) => headers,
            None => return RawTable::default(),
        };

        let mut records: Vec<Vec<String>> = rows.collect();
        while records
            .last()
            .is_some_and(|row| row.iter().all(|value| value.is_empty()))
        {
            records.pop();
        }

        RawTable { headers, records }
    }
}

impl TableReader for XlsxReader {
    fn read(&self, path: &Path) -> Result<RawTable> {
        if !path.is_file() {
            return Err(AppError::NotFound(format!("{}", path.display())));
        }

        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
            AppError::ParseError(format!("Failed to open Excel file: {}", e))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

        Ok(Self::range_to_table(&range))
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        // serial date-times
        _ => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
    }
}
