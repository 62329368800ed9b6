use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    ConfigError(String),
    UnsupportedFormat(String),
    ParseError(String),
    ColumnType(String),
    InvalidData(String),
    RenderError(String),
    IoError(String),
}

impl AppError {
    /// Error for a column whose kind does not meet a routine's requirement.
    pub fn column_type(column: &str, found: impl fmt::Display, expected: &str) -> Self {
        AppError::ColumnType(format!(
            "column '{}' is {}, expected {}",
            column, found, expected
        ))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::UnsupportedFormat(msg) => write!(f, "Unsupported file format: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ColumnType(msg) => write!(f, "Column type error: {}", msg),
            AppError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            AppError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_variant() {
        let err = AppError::NotFound("data.csv".to_string());
        assert_eq!(err.to_string(), "Not found: data.csv");
    }

    #[test]
    fn test_column_type_message() {
        let err = AppError::column_type("city", "text", "a numeric column");
        assert_eq!(
            err.to_string(),
            "Column type error: column 'city' is text, expected a numeric column"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(msg) if msg == "denied"));
    }
}
