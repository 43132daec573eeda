//! Page-shaped search responses for whatever transport sits in front of the index.
//!
//! The index itself returns matches in no particular order. Pages are only
//! meaningful over a stable order, so [`SearchPage::build`] sorts newest
//! first (ties broken by id) before slicing.

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use crate::document::Document;
use crate::searching::search_index::SearchIndex;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// One-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request, falling back to defaults for out-of-range values.
    pub fn new(page: usize, page_size: usize) -> Self {
        let mut request = Self::default();
        if page > 0 {
            request.page = page;
        }
        if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            request.page_size = page_size;
        }
        request
    }

    /// Parses raw query-string values. Anything unparsable or out of range
    /// silently becomes the default.
    ///
    /// ```
    /// # use logsearch::searching::pagination::PageRequest;
    /// let request = PageRequest::from_params(Some("3"), Some("500"));
    /// assert_eq!(request.page, 3);
    /// assert_eq!(request.page_size, 10);
    /// ```
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(page_size))
    }

    fn bounds(&self, total: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.page_size);
        if start >= total {
            return (0, 0);
        }
        (start, start.saturating_add(self.page_size).min(total))
    }
}

/// One page of results plus the totals a client needs to page further.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub total_results: usize,
    pub search_time_ms: f64,
    pub results: Vec<Arc<Document>>,
}

impl SearchPage {
    pub fn build(
        query: &str,
        mut results: Vec<Arc<Document>>,
        elapsed: Duration,
        request: PageRequest,
    ) -> Self {
        let total_results = results.len();
        results.sort_unstable_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });

        let (start, end) = request.bounds(total_results);
        results.truncate(end);
        results.drain(..start);

        Self {
            query: query.to_string(),
            total_results,
            search_time_ms: elapsed.as_micros() as f64 / 1000.0,
            results,
        }
    }
}

/// Searches `index` and renders the requested page.
pub fn run_search(index: &SearchIndex, query: &str, request: PageRequest) -> SearchPage {
    let (results, elapsed) = index.search(query);
    SearchPage::build(query, results, elapsed, request)
}
