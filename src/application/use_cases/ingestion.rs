use std::path::Path;

use tracing::info;

use crate::domain::dataset::Dataset;
use crate::domain::error::Result;
use crate::domain::file_format::FileFormat;
use crate::infrastructure::tabular::{CsvReader, TableReader, XlsxReader};

/// Load an uploaded file into a typed dataset, dispatching on its extension
#[derive(Debug, Clone)]
pub struct IngestionUseCase {
    sniff_rows: usize,
}

impl IngestionUseCase {
    pub fn new(sniff_rows: usize) -> Self {
        Self { sniff_rows }
    }

    pub fn execute(&self, path: &Path) -> Result<Dataset> {
        let format = FileFormat::from_path(path)?;
        let table = match format {
            FileFormat::Csv => CsvReader::new().read(path)?,
            FileFormat::Xlsx => XlsxReader::new().read(path)?,
        };

        let dataset = Dataset::from_records(table.headers, table.records, self.sniff_rows);
        info!(
            path = %path.display(),
            format = %format,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}
