// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached, rate-limited retrieval with retry.
//!
//! Cache and rate window each sit behind a `std::sync::Mutex`. Every
//! read-check-mutate sequence happens inside one lock scope and no guard is
//! ever held across an `.await`, so rate-limit waits and retry backoff
//! never block other callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::{debug, warn};

use waypoint_config::model::RetrievalConfig;
use waypoint_core::{with_timeout, SearchDepth, SearchProvider, SearchResult};

use crate::cache::{policy_for, ResultCache};
use crate::rate_limit::RateWindow;

/// Returned by [`RetrievalClient::get_context`] when nothing was found.
pub const NO_CONTEXT: &str = "No relevant information found.";

const CACHE_TYPE: &str = "retrieval";

/// Upper bound on the wait between two search attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Wait after failed attempt `attempt` (zero-based): `2^attempt` seconds,
/// capped at [`MAX_BACKOFF`].
pub fn backoff_for(attempt: u32) -> Duration {
    1u64.checked_shl(attempt)
        .map_or(MAX_BACKOFF, Duration::from_secs)
        .min(MAX_BACKOFF)
}

/// Cache and rate-limit counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalStats {
    pub cache_size: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Hits over lookups, as a percentage rounded to two decimals.
    pub hit_rate_percent: f64,
    pub rate_limit_calls_remaining: usize,
}

/// Stable cache key: hex SHA-256 of `"{query}:{max_results}"`.
pub fn cache_key(query: &str, max_results: usize) -> String {
    let digest = Sha256::digest(format!("{query}:{max_results}").as_bytes());
    hex::encode(digest)
}

/// Render results as numbered sources joined by blank lines.
pub fn format_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT.to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Source {}: {}\n{}\nURL: {}", i + 1, r.title, r.content, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Critical sections never panic midway, so a poisoned lock still holds
    // consistent data.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cached, rate-limited, retrying wrapper around a [`SearchProvider`].
///
/// A cache hit returns the stored list without touching the provider or the
/// rate window. A miss takes one slot from the rate window, sleeping until
/// one frees up, then calls the provider up to `max_retries` times with
/// exponential backoff. Exhausted retries yield an empty list, which callers
/// treat as "no context" rather than an error.
///
/// Concurrent misses for the same key may both reach the provider; the cache
/// converges on whichever result is inserted last.
pub struct RetrievalClient {
    provider: Arc<dyn SearchProvider>,
    depth: SearchDepth,
    cache: Mutex<ResultCache<Vec<SearchResult>>>,
    window: Mutex<RateWindow>,
    hits: AtomicU64,
    misses: AtomicU64,
    timeout: Duration,
    max_results: usize,
    max_retries: u32,
}

impl RetrievalClient {
    /// Build a client from the `[retrieval]` section.
    ///
    /// `depth` is forwarded to every provider call and `timeout` bounds each
    /// attempt individually.
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        config: &RetrievalConfig,
        depth: SearchDepth,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            depth,
            cache: Mutex::new(ResultCache::new(
                config.cache_capacity,
                policy_for(config.eviction),
            )),
            window: Mutex::new(RateWindow::new(
                config.max_requests_per_window,
                Duration::from_secs(config.window_secs),
            )),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            timeout,
            max_results: config.max_results,
            max_retries: config.max_retries,
        }
    }

    /// Configured default result count.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Configured default attempt count.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Search with caching, rate limiting and retry.
    ///
    /// Returns an empty list once `max_retries` attempts have failed; an
    /// empty list is never cached.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        max_retries: u32,
    ) -> Vec<SearchResult> {
        let key = cache_key(query, max_results);

        let cached = lock(&self.cache).get(&key);
        if let Some(hit) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            waypoint_prometheus::record_cache_hit(CACHE_TYPE);
            debug!(key = %key, "retrieval cache hit");
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        waypoint_prometheus::record_cache_miss(CACHE_TYPE);

        self.acquire_slot().await;

        for attempt in 0..max_retries {
            let outcome = with_timeout(
                "tavily",
                self.timeout,
                self.provider.search(query, self.depth, max_results),
            )
            .await;

            match outcome {
                Ok(results) => {
                    lock(&self.cache).insert(key, results.clone());
                    debug!(count = results.len(), attempt, "retrieval succeeded");
                    return results;
                }
                Err(e) if attempt + 1 < max_retries => {
                    let backoff = backoff_for(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries,
                        backoff_secs = backoff.as_secs(),
                        "search failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    warn!(error = %e, max_retries, "search failed, giving up");
                }
            }
        }

        Vec::new()
    }

    /// Search and format the results as a numbered context block.
    pub async fn get_context(&self, query: &str, max_results: usize) -> String {
        let results = self.search(query, max_results, self.max_retries).await;
        format_context(&results)
    }

    /// Snapshot of cache and rate-limit counters.
    pub fn stats(&self) -> RetrievalStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate_percent = if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64 * 10_000.0).round() / 100.0
        };

        RetrievalStats {
            cache_size: lock(&self.cache).len(),
            cache_hits: hits,
            cache_misses: misses,
            hit_rate_percent,
            rate_limit_calls_remaining: lock(&self.window).remaining(Instant::now()),
        }
    }

    /// Wait until the rate window admits one more call.
    async fn acquire_slot(&self) {
        loop {
            // The guard is a temporary dropped at the end of this statement.
            let verdict = lock(&self.window).try_acquire(Instant::now());
            match verdict {
                Ok(()) => return,
                Err(wait) => {
                    warn!(wait_secs = wait.as_secs_f64(), "rate limit reached, waiting");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_for(0), Duration::from_secs(1));
        assert_eq!(backoff_for(3), Duration::from_secs(8));
        assert_eq!(backoff_for(6), MAX_BACKOFF);
        assert_eq!(backoff_for(63), MAX_BACKOFF);
        assert_eq!(backoff_for(64), MAX_BACKOFF);
        assert_eq!(backoff_for(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn cache_key_is_hex_sha256() {
        let key = cache_key("rust", 3);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key("rust", 3));
        assert_ne!(key, cache_key("rust", 4));
    }

    #[test]
    fn context_is_numbered_from_one() {
        let results = vec![
            SearchResult {
                title: "A".into(),
                content: "alpha".into(),
                url: "https://a".into(),
                score: 0.9,
            },
            SearchResult {
                title: "B".into(),
                content: "beta".into(),
                url: "https://b".into(),
                score: 0.8,
            },
        ];
        assert_eq!(
            format_context(&results),
            "Source 1: A\nalpha\nURL: https://a\n\nSource 2: B\nbeta\nURL: https://b"
        );
    }

    #[test]
    fn empty_context_is_sentinel() {
        assert_eq!(format_context(&[]), NO_CONTEXT);
    }
}
