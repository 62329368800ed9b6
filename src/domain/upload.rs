use serde::{Deserialize, Serialize};

/// Reason an upload was turned away before anything was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadRejection {
    MissingFile,
    EmptyFilename,
    UnsupportedExtension,
    InvalidFilename,
    TooLarge,
}

impl UploadRejection {
    const ALL: [UploadRejection; 5] = [
        UploadRejection::MissingFile,
        UploadRejection::EmptyFilename,
        UploadRejection::UnsupportedExtension,
        UploadRejection::InvalidFilename,
        UploadRejection::TooLarge,
    ];

    /// Short code carried in the redirect query string
    pub fn code(&self) -> &'static str {
        match self {
            UploadRejection::MissingFile => "missing-file",
            UploadRejection::EmptyFilename => "empty-filename",
            UploadRejection::UnsupportedExtension => "unsupported-extension",
            UploadRejection::InvalidFilename => "invalid-filename",
            UploadRejection::TooLarge => "file-too-large",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn message(&self) -> &'static str {
        match self {
            UploadRejection::MissingFile => "The form did not include a file.",
            UploadRejection::EmptyFilename => "Choose a file before uploading.",
            UploadRejection::UnsupportedExtension => "Only .csv and .xlsx files are accepted.",
            UploadRejection::InvalidFilename => "The file name must not contain path separators.",
            UploadRejection::TooLarge => "The file is larger than the upload limit.",
        }
    }
}

/// Result of handling one upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored { filename: String },
    Rejected(UploadRejection),
}
