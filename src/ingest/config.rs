use std::path::Path;

/// Maximum number of files decoded concurrently
pub const DEFAULT_FILE_WORKERS: usize = 4;

/// Number of rows extracted and indexed per batch
pub const DEFAULT_BATCH_ROWS: usize = 1000;

/// Maximum number of concurrent batch workers per file
pub const DEFAULT_BATCH_WORKERS: usize = 8;

pub const DEFAULT_EXTENSION: &str = "parquet";

/// Concurrency limits and file selection for directory ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub file_workers: usize,
    pub batch_rows: usize,
    pub batch_workers: usize,
    /// Only files with this extension (case-insensitive) are ingested.
    /// `None` ingests every regular file in the directory.
    pub extension: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            file_workers: DEFAULT_FILE_WORKERS,
            batch_rows: DEFAULT_BATCH_ROWS,
            batch_workers: DEFAULT_BATCH_WORKERS,
            extension: Some(DEFAULT_EXTENSION.to_string()),
        }
    }
}

impl IngestConfig {
    /// Copy with every limit raised to at least one.
    pub fn normalized(&self) -> Self {
        Self {
            file_workers: self.file_workers.max(1),
            batch_rows: self.batch_rows.max(1),
            batch_workers: self.batch_workers.max(1),
            extension: self
                .extension
                .as_deref()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty()),
        }
    }

    /// Whether `path` passes the extension filter.
    pub fn accepts(&self, path: &Path) -> bool {
        match self.extension.as_deref() {
            None => true,
            Some(wanted) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.'))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.file_workers, 4);
        assert_eq!(config.batch_rows, 1000);
        assert_eq!(config.batch_workers, 8);
        assert_eq!(config.extension.as_deref(), Some("parquet"));
    }

    #[test]
    fn test_normalized_clamps_zero_limits() {
        let config = IngestConfig {
            file_workers: 0,
            batch_rows: 0,
            batch_workers: 0,
            extension: Some(".PARQUET".into()),
        }
        .normalized();
        assert_eq!((config.file_workers, config.batch_rows, config.batch_workers), (1, 1, 1));
        assert_eq!(config.extension.as_deref(), Some("PARQUET"));

        let empty = IngestConfig {
            extension: Some(String::new()),
            ..IngestConfig::default()
        };
        assert_eq!(empty.normalized().extension, None);
    }

    #[test]
    fn test_extension_filter() {
        let config = IngestConfig::default();
        assert!(config.accepts(Path::new("/data/a.parquet")));
        assert!(config.accepts(Path::new("/data/B.PARQUET")));
        assert!(!config.accepts(Path::new("/data/notes.txt")));
        assert!(!config.accepts(Path::new("/data/parquet")));

        let all = IngestConfig {
            extension: None,
            ..IngestConfig::default()
        };
        assert!(all.accepts(Path::new("/data/notes.txt")));
    }
}
