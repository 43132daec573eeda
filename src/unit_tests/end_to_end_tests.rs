#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use tempfile::TempDir;
    use crate::ingest::ingest_directory;
    use crate::searching::pagination::{run_search, PageRequest};
    use crate::searching::search_index::SearchIndex;
    use crate::unit_tests::fixtures::{write_log_file, EVENTS};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_event_counts_match_generated_data() {
        let dir = TempDir::new().unwrap();
        let mut docs = write_log_file(dir.path(), "east", 1_500, 21);
        docs.extend(write_log_file(dir.path(), "west", 1_500, 22));

        let index = Arc::new(SearchIndex::new());
        ingest_directory(&index, dir.path()).await.unwrap();

        for event in EVENTS {
            let expected = docs.iter().filter(|d| d.event == event).count();
            assert_eq!(index.search(event).0.len(), expected, "event {event}");

            let expected_west = docs
                .iter()
                .filter(|d| d.event == event && d.id.starts_with("west-"))
                .count();
            assert_eq!(index.search(&format!("{event} west")).0.len(), expected_west);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pages_newest_first_after_ingestion() {
        let dir = TempDir::new().unwrap();
        write_log_file(dir.path(), "paged", 35, 3);

        let index = Arc::new(SearchIndex::new());
        ingest_directory(&index, dir.path()).await.unwrap();

        let first = run_search(&index, "common paged", PageRequest::default());
        assert_eq!(first.total_results, 35);
        assert_eq!(first.results.len(), 10);
        assert_eq!(first.results[0].id, "paged-34");
        assert_eq!(first.results[9].id, "paged-25");

        let last = run_search(&index, "common paged", PageRequest::new(4, 10));
        let ids: Vec<&str> = last.results.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["paged-4", "paged-3", "paged-2", "paged-1", "paged-0"]);

        let json = serde_json::to_value(&last).unwrap();
        assert_eq!(json["totalResults"], 35);
        assert_eq!(json["results"][0]["eventID"], "E4");
        assert_eq!(json["results"][0]["namespace"], "production");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reingesting_overwrites_by_id() {
        let dir = TempDir::new().unwrap();
        write_log_file(dir.path(), "again", 50, 8);

        let index = Arc::new(SearchIndex::new());
        let first = ingest_directory(&index, dir.path()).await.unwrap();
        let second = ingest_directory(&index, dir.path()).await.unwrap();

        assert_eq!(first.documents_indexed, 50);
        assert_eq!(second.documents_indexed, 50);
        assert_eq!(index.len(), 50);
        assert_eq!(index.search("common again").0.len(), 50);
    }
}
