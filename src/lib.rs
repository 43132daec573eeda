//! Logsearch - Keyword Search over Directories of Parquet Log Batches
//!
//! Ingests a directory of Parquet files into an in-memory inverted index and
//! answers AND keyword queries against it.
//!
//! # Overview
//!
//! This library provides:
//! - **Concurrent ingestion**: bounded file-level and batch-level parallelism,
//!   one index lock acquisition per row batch
//! - **Forgiving extraction**: missing, null or mistyped columns degrade single
//!   fields to `""` / `0` instead of failing the file
//! - **Partial failure**: undecodable files are recorded and skipped, the rest
//!   of the directory is still indexed
//! - **AND search**: case-insensitive term matching with query timing
//! - **Paging**: newest-first pages in the shape served to clients
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use logsearch::{ingest_directory, run_search, PageRequest, SearchIndex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let index = Arc::new(SearchIndex::new());
//!
//!     // Load every .parquet file of the directory
//!     let report = ingest_directory(&index, "/var/log/batches").await?;
//!     println!("Indexed {} documents", report.documents_indexed);
//!
//!     // Query it
//!     let page = run_search(&index, "disk full", PageRequest::default());
//!     println!("{} matches in {:.3} ms", page.total_results, page.search_time_ms);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Data flow
//!
//! ```text
//! directory ──▶ DirectoryIngestor ──▶ read_table (one per file)
//!                      │                     │
//!                      │              batch_ranges (B rows)
//!                      │                     │
//!                      │              extract_rows ──▶ SearchIndex::writer()
//!                      ▼
//!                 IngestReport            SearchIndex::search ──▶ SearchPage
//! ```
pub mod column_parquet_reader;
pub mod config;
pub mod document;
pub mod error;
pub mod ingest;
pub mod row_extractor;
pub mod searching;
#[cfg(test)]
pub mod unit_tests;
pub mod utils;

pub use crate::column_parquet_reader::{read_table, DecodedColumn, DecodedTable, ParquetSource};
pub use crate::config::Config;
pub use crate::document::Document;
pub use crate::error::{ConfigError, DecodeError, IngestError, IngestFailure, PathError};
pub use crate::ingest::{ingest_directory, DirectoryIngestor, IngestConfig, IngestReport};
pub use crate::row_extractor::{extract_rows, ColumnMapping};
pub use crate::searching::pagination::{run_search, PageRequest, SearchPage};
pub use crate::searching::search_index::{IndexWriter, SearchIndex};
pub use tokio_util::sync::CancellationToken;
