use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::column_parquet_reader::{read_table, ParquetSource};
use crate::error::{DecodeError, IngestError, IngestFailure, PathError};
use crate::ingest::config::IngestConfig;
use crate::ingest::occupancy::Occupancy;
use crate::ingest::report::IngestReport;
use crate::row_extractor::{batch_ranges, extract_rows, ColumnMapping};
use crate::searching::search_index::SearchIndex;

/// Loads every Parquet file of a directory into a shared [`SearchIndex`].
///
/// Work is admitted through two counting gates: at most
/// `file_workers` files are in flight at once, and within each file at most
/// `batch_workers` row batches. Each batch takes the index write lock once.
///
/// # Failure handling
///
/// - An unusable directory fails immediately with [`IngestError::Path`].
/// - A file that cannot be decoded, or a batch whose worker dies, is recorded
///   and logged; all other files and batches carry on.
/// - If anything was recorded the call returns [`IngestError::Incomplete`],
///   whose report still lists every failure. The index remains queryable.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use logsearch::{DirectoryIngestor, IngestConfig, SearchIndex};
///
/// # async fn example() -> Result<(), logsearch::IngestError> {
/// let index = Arc::new(SearchIndex::new());
/// let ingestor = DirectoryIngestor::new(Arc::clone(&index), IngestConfig::default());
/// let report = ingestor.ingest_directory("/var/log/batches").await?;
/// println!("indexed {} documents", report.documents_indexed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryIngestor {
    index: Arc<SearchIndex>,
    config: IngestConfig,
    mapping: Arc<ColumnMapping>,
    cancel: CancellationToken,
    running_batches: Arc<Occupancy>,
}

/// Everything a file task needs, cheap to clone into spawned tasks.
#[derive(Clone)]
struct FileContext {
    index: Arc<SearchIndex>,
    mapping: Arc<ColumnMapping>,
    cancel: CancellationToken,
    running_batches: Arc<Occupancy>,
    batch_rows: usize,
    batch_workers: usize,
}

#[derive(Debug, Default)]
struct FileOutcome {
    decoded: bool,
    cancelled: bool,
    batches_skipped: usize,
    peak_batch_tasks: usize,
    documents_indexed: usize,
    failures: Vec<IngestFailure>,
}

/// Waits for a permit unless the token is cancelled first.
async fn admit(gate: &Arc<Semaphore>, cancel: &CancellationToken) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = Arc::clone(gate).acquire_owned() => permit.ok(),
    }
}

impl DirectoryIngestor {
    pub fn new(index: Arc<SearchIndex>, config: IngestConfig) -> Self {
        Self {
            index,
            config: config.normalized(),
            mapping: Arc::new(ColumnMapping::default()),
            cancel: CancellationToken::new(),
            running_batches: Arc::new(Occupancy::default()),
        }
    }

    pub fn with_column_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = Arc::new(mapping);
        self
    }

    /// Stops admitting new files and batches once `token` is cancelled.
    /// Work already admitted runs to completion.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Batch tasks running right now, across every ingestion started from
    /// this ingestor or its clones.
    pub fn batches_in_flight(&self) -> usize {
        self.running_batches.current()
    }

    fn file_context(&self) -> FileContext {
        FileContext {
            index: Arc::clone(&self.index),
            mapping: Arc::clone(&self.mapping),
            cancel: self.cancel.clone(),
            running_batches: Arc::clone(&self.running_batches),
            batch_rows: self.config.batch_rows,
            batch_workers: self.config.batch_workers,
        }
    }

    /// Lists candidate files: direct children only, subdirectories skipped,
    /// extension filter applied, sorted by path.
    async fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>, PathError> {
        let metadata = tokio::fs::metadata(dir).await.map_err(|source| PathError::Access {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(PathError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let read_dir_error = |source| PathError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
            let path = entry.path();
            if entry.file_type().await.map_err(read_dir_error)?.is_dir() {
                debug!(path = %path.display(), "Skipping subdirectory");
                continue;
            }
            if !self.config.accepts(&path) {
                debug!(path = %path.display(), "Skipping file with unexpected extension");
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Ingests every candidate file of `dir`. Blocks until all admitted work is done.
    pub async fn ingest_directory(&self, dir: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let dir = dir.as_ref();
        info!(path = %dir.display(), "Checking folder");

        let files = self.discover_files(dir).await?;
        let mut report = IngestReport {
            files_discovered: files.len(),
            ..IngestReport::default()
        };
        info!(path = %dir.display(), files = files.len(), "Found files to ingest");

        let file_gate = Arc::new(Semaphore::new(self.config.file_workers));
        let running_files = Arc::new(Occupancy::default());
        let mut handles: Vec<(PathBuf, JoinHandle<FileOutcome>)> = Vec::with_capacity(files.len());

        for path in files {
            let Some(permit) = admit(&file_gate, &self.cancel).await else {
                report.files_skipped += 1;
                continue;
            };

            let ctx = self.file_context();
            let task_path = path.clone();
            let running_files = Arc::clone(&running_files);
            let handle = tokio::spawn(async move {
                let _permit = permit;
                let _running = running_files.enter();
                ingest_file(ctx, task_path).await
            });
            handles.push((path, handle));
        }

        let mut cancelled = report.files_skipped > 0;
        for (path, handle) in handles {
            match handle.await {
                Ok(outcome) => {
                    if outcome.decoded && !outcome.cancelled && outcome.failures.is_empty() {
                        report.files_indexed += 1;
                    }
                    cancelled |= outcome.cancelled;
                    report.batches_skipped += outcome.batches_skipped;
                    report.peak_batch_tasks = report.peak_batch_tasks.max(outcome.peak_batch_tasks);
                    report.documents_indexed += outcome.documents_indexed;
                    report.failures.extend(outcome.failures);
                }
                Err(join_error) => {
                    let failure = IngestFailure::File {
                        error: DecodeError::Interrupted {
                            source_name: path.display().to_string(),
                            reason: join_error.to_string(),
                        },
                        path,
                    };
                    warn!(error = %failure, "File worker failed");
                    report.failures.push(failure);
                }
            }
        }

        report.peak_file_tasks = running_files.peak();

        info!(
            path = %dir.display(),
            files = report.files_discovered,
            indexed = report.files_indexed,
            skipped = report.files_skipped,
            batches_skipped = report.batches_skipped,
            documents = report.documents_indexed,
            failures = report.failure_count(),
            "Finished ingesting folder"
        );

        if cancelled {
            Err(IngestError::Cancelled { report })
        } else if !report.failures.is_empty() {
            Err(IngestError::Incomplete { report })
        } else {
            Ok(report)
        }
    }
}

/// Decodes one file and indexes it batch by batch.
async fn ingest_file(ctx: FileContext, path: PathBuf) -> FileOutcome {
    info!(file = %path.display(), "Processing file");
    let mut outcome = FileOutcome::default();

    let table = match read_table(ParquetSource::Path(path.clone())).await {
        Ok(table) => Arc::new(table),
        Err(error) => {
            let failure = IngestFailure::File { path, error };
            warn!(error = %failure, "Skipping file");
            outcome.failures.push(failure);
            return outcome;
        }
    };
    outcome.decoded = true;

    let batch_gate = Arc::new(Semaphore::new(ctx.batch_workers));
    let file_batches = Arc::new(Occupancy::default());
    let ranges: Vec<Range<usize>> = batch_ranges(table.num_rows(), ctx.batch_rows).collect();
    let mut batches: Vec<(Range<usize>, JoinHandle<usize>)> = Vec::with_capacity(ranges.len());

    for rows in &ranges {
        let Some(permit) = admit(&batch_gate, &ctx.cancel).await else {
            outcome.cancelled = true;
            outcome.batches_skipped = ranges.len() - batches.len();
            debug!(file = %path.display(), skipped = outcome.batches_skipped, "Stopped admitting batches");
            break;
        };

        let table = Arc::clone(&table);
        let index = Arc::clone(&ctx.index);
        let mapping = Arc::clone(&ctx.mapping);
        let file_batches = Arc::clone(&file_batches);
        let running_batches = Arc::clone(&ctx.running_batches);
        let task_rows = rows.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let _in_file = file_batches.enter();
            let _running = running_batches.enter();
            let documents = extract_rows(&table, &mapping, task_rows);
            index.writer().index_batch(documents)
        });
        batches.push((rows.clone(), handle));
    }

    for (rows, handle) in batches {
        match handle.await {
            Ok(indexed) => {
                debug!(file = %path.display(), start_row = rows.start, end_row = rows.end, "Indexed batch");
                outcome.documents_indexed += indexed;
            }
            Err(join_error) => {
                let failure = IngestFailure::Batch {
                    path: path.clone(),
                    start_row: rows.start,
                    end_row: rows.end,
                    reason: join_error.to_string(),
                };
                warn!(error = %failure, "Batch worker failed");
                outcome.failures.push(failure);
            }
        }
    }

    outcome.peak_batch_tasks = file_batches.peak();

    info!(
        file = %path.display(),
        rows = table.num_rows(),
        documents = outcome.documents_indexed,
        "Indexed file"
    );
    outcome
}

/// Ingests `dir` into `index` with the default configuration.
pub async fn ingest_directory(index: &Arc<SearchIndex>, dir: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
    DirectoryIngestor::new(Arc::clone(index), IngestConfig::default())
        .ingest_directory(dir)
        .await
}
