//! Logsearch - Command Line Interface
//!
//! Loads a directory of Parquet log batches into memory and answers keyword
//! queries against it. Every run ingests the directory from scratch; nothing
//! is persisted between runs.
//!
//! # Commands
//!
//! - **`search`** - Ingests the directory, then prints one JSON page per query
//! - **`info`** - Ingests the directory and prints index statistics
//!
//! # Usage Examples
//!
//! ```bash
//! # Search for documents containing both terms
//! logsearch --parquet-path /var/log/batches search "disk full"
//!
//! # Second page of 25 results
//! logsearch --parquet-path /var/log/batches search error --page 2 --page-size 25
//!
//! # Read one query per line from stdin
//! printf 'timeout\nlogin failed\n' | SEARCH_ENGINE_PARQUET_PATH=/var/log/batches logsearch search
//!
//! # Index statistics, with batch detail in the log
//! RUST_LOG=debug logsearch --parquet-path /var/log/batches info
//! ```
//!
//! Logs go to stderr, results to stdout. Ctrl-C during ingestion stops
//! admitting new files and batches; whatever was indexed by then is still
//! searched. A second Ctrl-C, or any Ctrl-C once ingestion is over, exits.
//!
//! # Exit Codes
//!
//! - `0` - Success, including runs where some files could not be ingested
//! - `1` - Invalid configuration or unusable directory
//! - `130` - Interrupted by Ctrl-C
//!

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use logsearch::ingest::config::{DEFAULT_BATCH_ROWS, DEFAULT_BATCH_WORKERS, DEFAULT_EXTENSION, DEFAULT_FILE_WORKERS};
use logsearch::searching::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use logsearch::{
    run_search, CancellationToken, Config, DirectoryIngestor, IngestConfig, IngestError, IngestReport, PageRequest,
    SearchIndex,
};

#[derive(Parser)]
#[command(version, about = "In-memory keyword search over a directory of Parquet log batches")]
struct Cli {
    #[command(flatten)]
    ingest: IngestArgs,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct IngestArgs {
    /// Directory containing the Parquet files
    #[arg(long, global = true, env = "SEARCH_ENGINE_PARQUET_PATH")]
    parquet_path: Option<PathBuf>,

    /// Files decoded concurrently
    #[arg(long, global = true, default_value_t = DEFAULT_FILE_WORKERS)]
    file_workers: usize,

    /// Rows per indexing batch
    #[arg(long, global = true, default_value_t = DEFAULT_BATCH_ROWS)]
    batch_rows: usize,

    /// Concurrent batches per file
    #[arg(long, global = true, default_value_t = DEFAULT_BATCH_WORKERS)]
    batch_workers: usize,

    /// Only ingest files with this extension
    #[arg(long, global = true, default_value = DEFAULT_EXTENSION, conflicts_with = "all_files")]
    extension: String,

    /// Ingest every regular file regardless of extension
    #[arg(long, global = true, default_value_t = false)]
    all_files: bool,
}

impl IngestArgs {
    fn into_config(self) -> Config {
        Config {
            parquet_path: self.parquet_path.unwrap_or_default(),
            ingest: IngestConfig {
                file_workers: self.file_workers,
                batch_rows: self.batch_rows,
                batch_workers: self.batch_workers,
                extension: (!self.all_files).then_some(self.extension),
            },
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Search for documents containing every term of the query
    Search {
        /// Queries to run; read line by line from stdin when omitted
        queries: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Print document and term counts after ingestion
    Info,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    /// Stop admitting ingestion work and keep going with what is indexed.
    StopIngestion,
    Exit,
}

/// Decides what a Ctrl-C does. The first one during ingestion cancels it;
/// once `ingestion` is cancelled, by a signal or because ingestion finished,
/// the next one exits.
fn on_interrupt(ingestion: &CancellationToken) -> Interrupt {
    if ingestion.is_cancelled() {
        return Interrupt::Exit;
    }
    ingestion.cancel();
    Interrupt::StopIngestion
}

/// Installs the Ctrl-C handler for the rest of the process.
fn spawn_interrupt_handler(ingestion: CancellationToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&ingestion) {
                Interrupt::StopIngestion => warn!("Interrupted, finishing work already started"),
                Interrupt::Exit => process::exit(INTERRUPTED_EXIT_CODE),
            }
        }
    });
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.ingest.into_config();
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let ingestion = CancellationToken::new();
    spawn_interrupt_handler(ingestion.clone());

    let index = Arc::new(SearchIndex::new());
    let report = load_directory(&index, &config, ingestion.clone()).await;
    // Nothing is left to cancel, so the next Ctrl-C exits
    ingestion.cancel();

    match cli.cmd {
        Cmd::Search { queries, page, page_size } => {
            handle_search(&index, queries, PageRequest::new(page, page_size));
        }
        Cmd::Info => handle_info(&index, &config, &report),
    }
}

/// Ingests the configured directory. Exits on directory errors; partial and
/// interrupted ingestion only warn, since the index stays usable.
async fn load_directory(index: &Arc<SearchIndex>, config: &Config, cancel: CancellationToken) -> IngestReport {
    let ingestor = DirectoryIngestor::new(Arc::clone(index), config.ingest.clone()).with_cancellation(cancel);
    match ingestor.ingest_directory(&config.parquet_path).await {
        Ok(report) => {
            info!(documents = index.len(), "Indexed all documents");
            report
        }
        Err(IngestError::Path(e)) => {
            error!(error = %e, "Cannot ingest directory");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        Err(IngestError::Incomplete { report }) => {
            warn!(
                failures = report.failure_count(),
                documents = index.len(),
                "Some files could not be ingested, serving partial index"
            );
            report
        }
        Err(IngestError::Cancelled { report }) => {
            warn!(
                skipped = report.files_skipped,
                documents = index.len(),
                "Ingestion cancelled, serving partial index"
            );
            report
        }
    }
}

fn handle_search(index: &SearchIndex, queries: Vec<String>, request: PageRequest) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut run = |query: &str| {
        let page = run_search(index, query, request);
        let written = serde_json::to_writer(&mut out, &page)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(e) = written {
            eprintln!("Error: failed to write results: {}", e);
            process::exit(1);
        }
    };

    if !queries.is_empty() {
        for query in &queries {
            run(query);
        }
        return;
    }

    for line in io::stdin().lock().lines() {
        match line {
            Ok(query) if query.trim().is_empty() => continue,
            Ok(query) => run(&query),
            Err(e) => {
                eprintln!("Error: failed to read query: {}", e);
                process::exit(1);
            }
        }
    }
}

fn handle_info(index: &SearchIndex, config: &Config, report: &IngestReport) {
    println!("================================================================================");
    println!("Index Information for: {}", config.parquet_path.display());
    println!("================================================================================");
    println!();
    println!("INGESTION");
    println!("─────────");
    println!("Files Discovered:     {}", report.files_discovered);
    println!("Files Indexed:        {}", report.files_indexed);
    println!("Files Skipped:        {}", report.files_skipped);
    println!("Batches Skipped:      {}", report.batches_skipped);
    println!("Peak File Tasks:      {}", report.peak_file_tasks);
    println!("Peak Batch Tasks:     {}", report.peak_batch_tasks);
    println!("Rows Indexed:         {}", report.documents_indexed);
    println!("Failures:             {}", report.failure_count());
    for failure in &report.failures {
        println!("  - {}", failure);
    }
    println!();
    println!("INDEX");
    println!("─────");
    println!("Documents:            {}", index.len());
    println!("Distinct Terms:       {}", index.term_count());
    println!();
    println!("================================================================================");
}
