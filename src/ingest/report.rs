use crate::error::IngestFailure;

/// What a directory ingestion did.
///
/// Returned on success, and carried inside [`crate::IngestError::Incomplete`]
/// and [`crate::IngestError::Cancelled`] so partial runs stay inspectable.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Candidate files found in the directory after filtering.
    pub files_discovered: usize,
    /// Files decoded and fully indexed without any failure.
    pub files_indexed: usize,
    /// Files never started because ingestion was cancelled.
    pub files_skipped: usize,
    /// Row batches of started files that were never admitted because
    /// ingestion was cancelled.
    pub batches_skipped: usize,
    /// Documents handed to the index, overwrites included.
    pub documents_indexed: usize,
    /// Every captured per-file and per-batch failure.
    pub failures: Vec<IngestFailure>,
    /// Most file tasks that ran at the same time.
    pub peak_file_tasks: usize,
    /// Most batch tasks of a single file that ran at the same time.
    pub peak_batch_tasks: usize,
}

impl IngestReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when every discovered file was ingested without failure.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.files_skipped == 0 && self.batches_skipped == 0
    }
}
