use crate::domain::error::Result;
use crate::domain::statistics::{describe, Summary};
use crate::infrastructure::storage::UploadStore;

use super::ingestion::IngestionUseCase;

#[derive(Debug, Clone)]
pub struct DescribeUseCase {
    store: UploadStore,
    ingestion: IngestionUseCase,
}

impl DescribeUseCase {
    pub fn new(store: UploadStore, ingestion: IngestionUseCase) -> Self {
        Self { store, ingestion }
    }

    /// Descriptive statistics of a stored upload, re-read from disk
    pub fn execute(&self, filename: &str) -> Result<Summary> {
        let path = self.store.existing_path(filename)?;
        let dataset = self.ingestion.execute(&path)?;
        Ok(describe(&dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::statistics::NUMERIC_STAT_LABELS;

    #[test]
    fn test_describe_stored_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("d.csv"), "x,y,name\n1,2,a\n3,4,b\n").unwrap();
        let store = UploadStore::open(tmp.path()).unwrap();

        let summary = DescribeUseCase::new(store, IngestionUseCase::new(100))
            .execute("d.csv")
            .unwrap();

        assert_eq!(summary.columns, vec!["x", "y"]);
        assert_eq!(summary.rows.len(), NUMERIC_STAT_LABELS.len());
    }

    #[test]
    fn test_missing_upload() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::open(tmp.path()).unwrap();
        let err = DescribeUseCase::new(store, IngestionUseCase::new(100))
            .execute("nope.csv")
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
