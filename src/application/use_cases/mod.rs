pub mod describe;
pub mod ingestion;
pub mod plotting;
pub mod upload;
