pub mod use_cases;

pub use use_cases::describe::DescribeUseCase;
pub use use_cases::ingestion::IngestionUseCase;
pub use use_cases::plotting::{ChartSet, PlottingUseCase};
pub use use_cases::upload::{UploadUseCase, UploadedFile};
