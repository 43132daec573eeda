use std::path::PathBuf;
use crate::error::ConfigError;
use crate::ingest::IngestConfig;

/// Application configuration handed over by the command line layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the Parquet batch files to ingest.
    pub parquet_path: PathBuf,
    pub ingest: IngestConfig,
}

impl Config {
    pub fn new(parquet_path: impl Into<PathBuf>) -> Self {
        Self {
            parquet_path: parquet_path.into(),
            ingest: IngestConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parquet_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingParquetPath);
        }
        let limits = [
            ("file_workers", self.ingest.file_workers),
            ("batch_rows", self.ingest.batch_rows),
            ("batch_workers", self.ingest.batch_workers),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidLimit { name });
            }
        }
        Ok(())
    }
}
