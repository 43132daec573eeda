// Test module organization for searching
// This module is only compiled during testing via #[cfg(test)] in searching/mod.rs

// Import everything the index tests share
use crate::document::Document;
use crate::searching::search_index::SearchIndex;

// External dependencies used across tests
use hashbrown::HashSet;

// Test submodules - each contains related tests
mod and_semantics;

/// Ids of a result set, order removed.
fn ids(results: &[std::sync::Arc<Document>]) -> HashSet<String> {
    results.iter().map(|doc| doc.id.clone()).collect()
}

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// The three-document corpus used throughout the AND tests.
fn abc_index() -> SearchIndex {
    let index = SearchIndex::new();
    index.index_document(Document::new("A", "alpha beta"));
    index.index_document(Document::new("B", "alpha gamma"));
    index.index_document(Document::new("C", "beta gamma"));
    index
}
