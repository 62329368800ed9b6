// ============================================================
// TABULAR FILE READERS
// ============================================================
// Read CSV and XLSX files into a header row plus raw string records

mod csv_reader;
mod xlsx_reader;

pub use csv_reader::CsvReader;
pub use xlsx_reader::XlsxReader;

use std::path::Path;

use crate::domain::error::Result;

/// Header row and records as read from disk, before typing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

pub trait TableReader {
    fn read(&self, path: &Path) -> Result<RawTable>;
}
