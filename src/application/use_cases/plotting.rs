use tracing::debug;

use crate::domain::error::Result;
use crate::infrastructure::charts::{render, ChartImage, HistogramGrid, LineChart, PieChart};
use crate::infrastructure::config::ChartFormat;
use crate::infrastructure::storage::UploadStore;

use super::ingestion::IngestionUseCase;

/// The three charts shown on the plot page
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub histogram: ChartImage,
    pub pie: ChartImage,
    pub line: ChartImage,
}

impl ChartSet {
    pub fn images(&self) -> [&ChartImage; 3] {
        [&self.histogram, &self.pie, &self.line]
    }
}

#[derive(Debug, Clone)]
pub struct PlottingUseCase {
    store: UploadStore,
    ingestion: IngestionUseCase,
    histogram_bins: usize,
    format: ChartFormat,
}

impl PlottingUseCase {
    pub fn new(
        store: UploadStore,
        ingestion: IngestionUseCase,
        histogram_bins: usize,
        format: ChartFormat,
    ) -> Self {
        Self {
            store,
            ingestion,
            histogram_bins,
            format,
        }
    }

    pub fn execute(&self, filename: &str) -> Result<ChartSet> {
        let path = self.store.existing_path(filename)?;
        let dataset = self.ingestion.execute(&path)?;

        let histogram = render(&HistogramGrid::new(&dataset, self.histogram_bins)?, self.format)?;
        let pie = render(&PieChart::new(&dataset)?, self.format)?;
        let line = render(&LineChart::new(&dataset)?, self.format)?;

        debug!(
            filename = %filename,
            histogram_bytes = histogram.bytes.len(),
            pie_bytes = pie.bytes.len(),
            line_bytes = line.bytes.len(),
            "Rendered charts"
        );

        Ok(ChartSet {
            histogram,
            pie,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;

    fn use_case(dir: &std::path::Path) -> PlottingUseCase {
        let store = UploadStore::open(dir).unwrap();
        PlottingUseCase::new(store, IngestionUseCase::new(100), 10, ChartFormat::Svg)
    }

    #[test]
    fn test_three_distinct_images() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("n.csv"), "a,b,c\n1,2,3\n4,5,6\n").unwrap();

        let charts = use_case(tmp.path()).execute("n.csv").unwrap();
        let [h, p, l] = charts.images();
        assert_ne!(h.bytes, p.bytes);
        assert_ne!(p.bytes, l.bytes);
        assert_ne!(h.bytes, l.bytes);
    }

    #[test]
    fn test_text_series_fails_with_column_type() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("m.csv"), "a,b\n1,x\n2,y\n").unwrap();

        let err = use_case(tmp.path()).execute("m.csv").unwrap_err();
        assert!(matches!(err, AppError::ColumnType(_)));
    }
}
