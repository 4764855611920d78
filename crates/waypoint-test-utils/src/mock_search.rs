// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock web search provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use waypoint_core::{AdapterType, PluginAdapter, SearchDepth, SearchProvider, SearchResult, WaypointError};

/// Returns a fixed result list, optionally failing the first N calls.
#[derive(Clone)]
pub struct MockSearch {
    results: Arc<Vec<SearchResult>>,
    failures_left: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<(String, SearchDepth, usize)>>>,
}

impl MockSearch {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results: Arc::new(results),
            failures_left: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails the first `n` calls, then returns `results`.
    pub fn failing_times(n: usize, results: Vec<SearchResult>) -> Self {
        let search = Self::with_results(results);
        search.failures_left.store(n, Ordering::SeqCst);
        search
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self::failing_times(usize::MAX, Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(query, depth, max_results)` per call, oldest first.
    pub async fn queries(&self) -> Vec<(String, SearchDepth, usize)> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockSearch {
    fn name(&self) -> &str {
        "mock-search"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, WaypointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .await
            .push((query.to_string(), depth, max_results));

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(WaypointError::external_msg("mock-search", "503 service unavailable"));
        }
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}
