use tracing::{info, warn};

use crate::domain::error::Result;
use crate::domain::file_format::FileFormat;
use crate::domain::upload::{UploadOutcome, UploadRejection};
use crate::infrastructure::storage::{is_plain_file_name, UploadStore};

/// A file part pulled out of the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadUseCase {
    store: UploadStore,
}

impl UploadUseCase {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }

    /// Check the file's name and persist it verbatim.
    ///
    /// `None` means the form carried no file field at all.
    pub async fn execute(&self, file: Option<UploadedFile>) -> Result<UploadOutcome> {
        let file = match file {
            Some(file) => file,
            None => return Ok(self.reject(UploadRejection::MissingFile, "")),
        };

        if file.filename.is_empty() {
            return Ok(self.reject(UploadRejection::EmptyFilename, ""));
        }
        if FileFormat::from_filename(&file.filename).is_none() {
            return Ok(self.reject(UploadRejection::UnsupportedExtension, &file.filename));
        }
        if !is_plain_file_name(&file.filename) {
            return Ok(self.reject(UploadRejection::InvalidFilename, &file.filename));
        }

        let path = self.store.save(&file.filename, &file.bytes).await?;
        info!(
            filename = %file.filename,
            bytes = file.bytes.len(),
            path = %path.display(),
            "Stored upload"
        );

        Ok(UploadOutcome::Stored {
            filename: file.filename,
        })
    }

    fn reject(&self, rejection: UploadRejection, filename: &str) -> UploadOutcome {
        warn!(filename = %filename, reason = rejection.code(), "Rejected upload");
        UploadOutcome::Rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, bytes: &[u8]) -> Option<UploadedFile> {
        Some(UploadedFile {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        })
    }

    fn stored_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[actix_web::test]
    async fn test_accepted_upload_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let use_case = UploadUseCase::new(UploadStore::open(tmp.path()).unwrap());
        let bytes = b"a,b\n1,2\n\xff\x00raw";

        let outcome = use_case.execute(file("Data.CSV", bytes)).await.unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Stored {
                filename: "Data.CSV".to_string()
            }
        );
        assert_eq!(std::fs::read(tmp.path().join("Data.CSV")).unwrap(), bytes);
    }

    #[actix_web::test]
    async fn test_rejections_write_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let use_case = UploadUseCase::new(UploadStore::open(tmp.path()).unwrap());

        let cases = [
            (None, UploadRejection::MissingFile),
            (file("", b"x"), UploadRejection::EmptyFilename),
            (file("notes.txt", b"x"), UploadRejection::UnsupportedExtension),
            (file("noextension", b"x"), UploadRejection::UnsupportedExtension),
            (file("../escape.csv", b"x"), UploadRejection::InvalidFilename),
        ];
        for (input, expected) in cases {
            let outcome = use_case.execute(input).await.unwrap();
            assert_eq!(outcome, UploadOutcome::Rejected(expected));
        }
        assert_eq!(stored_files(tmp.path()), 0);
    }

    #[actix_web::test]
    async fn test_reupload_replaces_content() {
        let tmp = tempfile::tempdir().unwrap();
        let use_case = UploadUseCase::new(UploadStore::open(tmp.path()).unwrap());

        use_case.execute(file("same.csv", b"old\n1\n")).await.unwrap();
        use_case.execute(file("same.csv", b"new\n2\n")).await.unwrap();

        assert_eq!(std::fs::read(tmp.path().join("same.csv")).unwrap(), b"new\n2\n");
        assert_eq!(stored_files(tmp.path()), 1);
    }
}
