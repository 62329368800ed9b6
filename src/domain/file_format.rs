use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Upload formats the ingestion step understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 2] = ["csv", "xlsx"];

    /// Format from the suffix after the last `.`, compared case-insensitively
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::from_filename)
            .ok_or_else(|| AppError::UnsupportedFormat(format!("{}", path.display())))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "CSV"),
            FileFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}
