// ============================================================
// CSV READER
// ============================================================
// Comma-separated files with encoding fallback

use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;

use super::{RawTable, TableReader};
use crate::domain::error::{AppError, Result};

pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CSV content from string. The first record is the header row.
    pub fn parse_content(&self, content: &str) -> Result<RawTable> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            // blank line
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 2);
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawTable { headers, records })
    }

    /// UTF-8 when valid, Windows-1252 otherwise
    fn decode(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(content) => content.to_string(),
            Err(_) => {
                let (content, _, _) = WINDOWS_1252.decode(bytes);
                content.into_owned()
            }
        }
    }
}

impl TableReader for CsvReader {
    fn read(&self, path: &Path) -> Result<RawTable> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AppError::NotFound(format!("{}", path.display()))
            }
            _ => AppError::IoError(format!("Failed to read file {}: {}", path.display(), e)),
        })?;

        self.parse_content(&Self::decode(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let table = CsvReader::new()
            .parse_content("name,age,city\nAlice,30,NYC\nBob,25,LA")
            .unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1], vec!["Bob", "25", "LA"]);
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let table = CsvReader::new()
            .parse_content("\u{feff}a,b\n\"x, y\",\"say \"\"hi\"\"\"\n")
            .unwrap();

        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.records[0], vec!["x, y", "say \"hi\""]);
    }

    #[test]
    fn test_blank_lines_skipped_and_short_rows_kept() {
        let table = CsvReader::new().parse_content("a,b\n1,2\n\n3\n").unwrap();
        assert_eq!(table.records, vec![vec!["1", "2"], vec!["3"]]);
    }

    #[test]
    fn test_long_row_is_error() {
        let err = CsvReader::new().parse_content("a,b\n1,2,3\n").unwrap_err();
        match err {
            AppError::ParseError(msg) => assert!(msg.contains("Expected 2 fields"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_content_is_error() {
        let err = CsvReader::new().parse_content("").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("latin.csv");
        std::fs::write(&path, b"city\nM\xfcnchen\n").unwrap();

        let table = CsvReader::new().read(&path).unwrap();
        assert_eq!(table.records[0], vec!["M\u{fc}nchen"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = CsvReader::new()
            .read(Path::new("/nonexistent/file.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
