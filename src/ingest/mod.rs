pub mod config;
pub mod occupancy;
pub mod report;
pub mod scheduler;

pub use config::IngestConfig;
pub use report::IngestReport;
pub use scheduler::{ingest_directory, DirectoryIngestor};
