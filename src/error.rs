use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::IngestReport;

/// The ingestion directory itself is unusable. Always fatal.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("folder access error for {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single source file could not be opened or decoded.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {source_name}: {source}")]
    Open {
        source_name: String,
        #[source]
        source: object_store::Error,
    },

    #[error("invalid parquet file {source_name}: {reason}")]
    InvalidFormat { source_name: String, reason: String },

    #[error("failed to read table from {source_name}: {source}")]
    Parquet {
        source_name: String,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to decode columns of {source_name}: {source}")]
    Arrow {
        source_name: String,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("decoding {source_name} was interrupted: {reason}")]
    Interrupted { source_name: String, reason: String },
}

/// A recoverable failure captured during ingestion. Siblings keep running.
#[derive(Error, Debug)]
pub enum IngestFailure {
    #[error("error processing {}: {error}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        error: DecodeError,
    },

    #[error("error processing rows {start_row}..{end_row} of {}: {reason}", .path.display())]
    Batch {
        path: PathBuf,
        start_row: usize,
        end_row: usize,
        reason: String,
    },
}

/// Outcome of a directory ingestion that did not fully succeed.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Path(#[from] PathError),

    /// Some files or batches failed; everything else was indexed.
    #[error("encountered {} errors during processing", .report.failure_count())]
    Incomplete { report: IngestReport },

    #[error(
        "ingestion cancelled: {} of {} files and {} batches of started files skipped",
        .report.files_skipped,
        .report.files_discovered,
        .report.batches_skipped
    )]
    Cancelled { report: IngestReport },
}

impl IngestError {
    /// The ingestion report, when work was attempted.
    pub fn report(&self) -> Option<&IngestReport> {
        match self {
            IngestError::Path(_) => None,
            IngestError::Incomplete { report } | IngestError::Cancelled { report } => Some(report),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing parquet path")]
    MissingParquetPath,

    #[error("{name} must be greater than zero")]
    InvalidLimit { name: &'static str },
}
