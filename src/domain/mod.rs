pub mod dataset;
pub mod error;
pub mod file_format;
pub mod statistics;
pub mod upload;
