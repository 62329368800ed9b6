pub mod bootstrap;
pub mod charts;
pub mod config;
pub mod storage;
pub mod tabular;
