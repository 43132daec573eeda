//! In-memory document store and inverted term index.
//!
//! A [`SearchIndex`] owns two maps behind one reader/writer lock:
//!
//! ```text
//! SearchIndex
//! └── RwLock<IndexState>
//!     ├── documents: id   -> Arc<Document>
//!     └── terms:     term -> {id, id, ...}
//! ```
//!
//! Writers take the lock exclusively, searches share it. The ingestion path
//! takes the write lock once per row batch through [`SearchIndex::writer`]
//! rather than once per document.
//!
//! # Known limitation
//!
//! The index is append/overwrite-only. Re-indexing an id replaces the stored
//! document but the replaced document's terms stay in `terms`, so a query
//! on one of those stale terms still resolves to the id (and returns the
//! current document).

use std::sync::Arc;
use std::time::{Duration, Instant};
use hashbrown::{HashMap, HashSet};
use parking_lot::{RwLock, RwLockWriteGuard};
use crate::document::Document;
use crate::searching::tokenizer::unique_terms;

#[derive(Debug, Default)]
struct IndexState {
    documents: HashMap<String, Arc<Document>>,
    terms: HashMap<String, HashSet<String>>,
}

impl IndexState {
    fn insert(&mut self, doc: Document) {
        for term in unique_terms(&doc.tokenizable_text()) {
            self.terms
                .entry(term)
                .or_default()
                .insert(doc.id.clone());
        }
        self.documents.insert(doc.id.clone(), Arc::new(doc));
    }

    fn matching_ids(&self, query: &str) -> Option<HashSet<&str>> {
        let query_terms = unique_terms(query);
        let mut terms = query_terms.iter();

        // AND semantics: seed with the first term, then narrow in query order
        let first = self.terms.get(terms.next()?)?;
        let mut matching: HashSet<&str> = first.iter().map(String::as_str).collect();

        for term in terms {
            let ids = self.terms.get(term)?;
            matching.retain(|id| ids.contains(*id));
            if matching.is_empty() {
                return None;
            }
        }

        Some(matching)
    }
}

/// Thread-safe keyword index over [`Document`]s.
///
/// Construct one per application and share it with `Arc`; ingestion and
/// query paths both take it explicitly.
///
/// # Examples
///
/// ```
/// use logsearch::{Document, SearchIndex};
///
/// let index = SearchIndex::new();
/// index.index_document(Document::new("a", "alpha beta"));
/// index.index_document(Document::new("b", "alpha gamma"));
///
/// let (results, _elapsed) = index.search("Alpha BETA");
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].id, "a");
/// ```
#[derive(Debug, Default)]
pub struct SearchIndex {
    state: RwLock<IndexState>,
}

/// Exclusive write access to a [`SearchIndex`]. The lock is released on drop.
pub struct IndexWriter<'a> {
    state: RwLockWriteGuard<'a, IndexState>,
}

impl IndexWriter<'_> {
    /// Stores `doc` under its id, overwriting any previous document with that id.
    pub fn index_document(&mut self, doc: Document) {
        self.state.insert(doc);
    }

    /// Indexes every document of `docs` under this single lock acquisition.
    ///
    /// Returns the number of documents indexed.
    pub fn index_batch<I>(&mut self, docs: I) -> usize
    where
        I: IntoIterator<Item = Document>,
    {
        let mut count = 0;
        for doc in docs {
            self.state.insert(doc);
            count += 1;
        }
        count
    }
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the write lock, blocking until every reader and writer has left.
    pub fn writer(&self) -> IndexWriter<'_> {
        IndexWriter {
            state: self.state.write(),
        }
    }

    /// Indexes a single document. Takes and releases the write lock.
    pub fn index_document(&self, doc: Document) {
        self.writer().index_document(doc);
    }

    /// Indexes a batch of documents under one write lock acquisition.
    pub fn index_batch<I>(&self, docs: I) -> usize
    where
        I: IntoIterator<Item = Document>,
    {
        self.writer().index_batch(docs)
    }

    /// Returns every document containing all terms of `query`.
    ///
    /// The query is tokenized exactly like indexed text. An empty query, an
    /// unknown term or an empty intersection all produce an empty result;
    /// there is no failure outcome. Result order is unspecified.
    ///
    /// The returned duration covers tokenizing, lookup and materializing.
    pub fn search(&self, query: &str) -> (Vec<Arc<Document>>, Duration) {
        let start = Instant::now();
        let state = self.state.read();

        let results = match state.matching_ids(query) {
            Some(ids) => ids
                .into_iter()
                .filter_map(|id| state.documents.get(id).cloned())
                .collect(),
            None => Vec::new(),
        };

        (results, start.elapsed())
    }

    /// Fetches a document by id.
    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        self.state.read().documents.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().documents.contains_key(id)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().documents.is_empty()
    }

    /// Number of distinct terms in the inverted index.
    pub fn term_count(&self) -> usize {
        self.state.read().terms.len()
    }
}
