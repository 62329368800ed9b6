use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::{AppError, Result};

/// Plain file names only: no separators, no NUL, not made of dots alone
static PLAIN_FILE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^/\\\x00]+$").unwrap());

/// Directory holding uploaded files, keyed by their original name
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open the store, creating its directory if absent
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `filename` inside the store. Rejects anything but a plain file name.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        if !is_plain_file_name(filename) {
            return Err(AppError::ValidationError(format!(
                "invalid file name: {:?}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }

    /// Existing file path, or `AppError::NotFound`
    pub fn existing_path(&self, filename: &str) -> Result<PathBuf> {
        let path = self.path_for(filename)?;
        if !path.is_file() {
            return Err(AppError::NotFound(format!("no uploaded file named {}", filename)));
        }
        Ok(path)
    }

    /// Write `bytes` under `filename`, replacing any previous content
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

pub fn is_plain_file_name(filename: &str) -> bool {
    PLAIN_FILE_NAME.is_match(filename) && filename.chars().any(|c| c != '.')
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    // create_dir_all fails when any component exists as a non-directory
    std::fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(UploadStore::open(file.path()).is_err());
    }

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("uploads");
        let store = UploadStore::open(&root).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("data.csv"));
        assert!(is_plain_file_name("my report (1).xlsx"));
        assert!(is_plain_file_name(".hidden.csv"));
        assert!(!is_plain_file_name("../etc/passwd.csv"));
        assert!(!is_plain_file_name("dir/data.csv"));
        assert!(!is_plain_file_name("dir\\data.csv"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("a\0.csv"));
    }

    #[test]
    fn test_existing_path_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::open(tmp.path()).unwrap();
        let err = store.existing_path("missing.csv").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_save_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::open(tmp.path()).unwrap();

        store.save("a.csv", b"x,y\n1,2\n").await.unwrap();
        let path = store.save("a.csv", b"z\n3\n").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"z\n3\n");
        assert_eq!(store.existing_path("a.csv").unwrap(), tmp.path().join("a.csv"));
    }
}
