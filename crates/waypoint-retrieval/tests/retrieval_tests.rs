// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the retrieval client's cache, rate limit and retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use waypoint_config::model::{EvictionKind, RetrievalConfig};
use waypoint_core::SearchDepth;
use waypoint_retrieval::{RetrievalClient, MAX_BACKOFF, NO_CONTEXT};
use waypoint_test_utils::{sample_result, MockSearch};

fn config() -> RetrievalConfig {
    RetrievalConfig::default()
}

fn client(search: &MockSearch, config: &RetrievalConfig) -> RetrievalClient {
    RetrievalClient::new(
        Arc::new(search.clone()),
        config,
        SearchDepth::Advanced,
        Duration::from_secs(30),
    )
}

#[tokio::test(start_paused = true)]
async fn identical_searches_hit_the_cache() {
    let search = MockSearch::with_results(vec![sample_result(1), sample_result(2)]);
    let client = client(&search, &config());

    let first = client.search("rust async", 3, 3).await;
    let second = client.search("rust async", 3, 3).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(search.call_count(), 1);

    let stats = client.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.hit_rate_percent, 50.0);
    assert_eq!(stats.cache_size, 1);
    assert_eq!(stats.rate_limit_calls_remaining, 9);
}

#[tokio::test(start_paused = true)]
async fn result_count_is_part_of_the_key() {
    let search = MockSearch::with_results((0..5).map(sample_result).collect());
    let client = client(&search, &config());

    assert_eq!(client.search("q", 2, 1).await.len(), 2);
    assert_eq!(client.search("q", 4, 1).await.len(), 4);
    assert_eq!(search.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn fifo_cache_evicts_oldest_query() {
    let search = MockSearch::with_results(vec![sample_result(1)]);
    let config = RetrievalConfig {
        cache_capacity: 2,
        ..config()
    };
    let client = client(&search, &config);

    client.search("a", 3, 1).await;
    client.search("b", 3, 1).await;
    client.search("c", 3, 1).await;
    assert_eq!(search.call_count(), 3);

    client.search("b", 3, 1).await;
    client.search("c", 3, 1).await;
    assert_eq!(search.call_count(), 3, "b and c should be cached");

    client.search("a", 3, 1).await;
    assert_eq!(search.call_count(), 4, "a should have been evicted");
}

#[tokio::test(start_paused = true)]
async fn lru_cache_keeps_recently_read_query() {
    let search = MockSearch::with_results(vec![sample_result(1)]);
    let config = RetrievalConfig {
        cache_capacity: 2,
        eviction: EvictionKind::Lru,
        ..config()
    };
    let client = client(&search, &config);

    client.search("a", 3, 1).await;
    client.search("b", 3, 1).await;
    client.search("a", 3, 1).await;
    client.search("c", 3, 1).await;
    client.search("a", 3, 1).await;

    assert_eq!(search.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_with_backoff() {
    let search = MockSearch::failing_times(2, vec![sample_result(1)]);
    let client = client(&search, &config());

    let start = Instant::now();
    let results = client.search("flaky", 3, 3).await;

    assert_eq!(results, vec![sample_result(1)]);
    assert_eq!(search.call_count(), 3);
    // Backoff of 1s then 2s between the three attempts.
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_yield_empty_and_sentinel() {
    let search = MockSearch::failing();
    let client = client(&search, &config());

    assert!(client.search("down", 3, 3).await.is_empty());
    assert_eq!(search.call_count(), 3);

    assert_eq!(client.get_context("down", 3).await, NO_CONTEXT);
    // Failures are not cached: the second lookup tried the provider again.
    assert_eq!(search.call_count(), 6);
    assert_eq!(client.stats().cache_size, 0);
}

#[tokio::test(start_paused = true)]
async fn long_retry_runs_finish_with_capped_backoff() {
    let search = MockSearch::failing();
    let client = client(&search, &config());

    let start = Instant::now();
    assert!(client.search("down", 3, 70).await.is_empty());

    assert_eq!(search.call_count(), 70);
    // 1 + 2 + 4 + 8 + 16 + 32 seconds, then 63 waits at the 60s cap.
    let expected = Duration::from_secs(63) + MAX_BACKOFF * 63;
    assert_eq!(start.elapsed(), expected);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_waits_for_window_without_failing() {
    let search = MockSearch::with_results(vec![sample_result(1)]);
    let config = RetrievalConfig {
        max_requests_per_window: 2,
        window_secs: 60,
        ..config()
    };
    let client = client(&search, &config);

    let start = Instant::now();
    client.search("one", 3, 1).await;
    client.search("two", 3, 1).await;
    assert_eq!(client.stats().rate_limit_calls_remaining, 0);
    assert!(start.elapsed() < Duration::from_secs(1));

    let third = client.search("three", 3, 1).await;
    assert_eq!(third.len(), 1);
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert_eq!(search.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn cache_hits_do_not_consume_rate_slots() {
    let search = MockSearch::with_results(vec![sample_result(1)]);
    let config = RetrievalConfig {
        max_requests_per_window: 1,
        ..config()
    };
    let client = client(&search, &config);

    let start = Instant::now();
    for _ in 0..5 {
        client.search("same", 3, 1).await;
    }
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(search.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_respect_the_window() {
    let search = MockSearch::with_results(vec![sample_result(1)]);
    let config = RetrievalConfig {
        max_requests_per_window: 2,
        window_secs: 10,
        ..config()
    };
    let client = Arc::new(client(&search, &config));

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.search(&format!("query {i}"), 3, 1).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().len(), 1);
    }

    assert_eq!(search.call_count(), 4);
    assert!(start.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn get_context_formats_sources() {
    let search = MockSearch::with_results(vec![sample_result(1), sample_result(2)]);
    let client = client(&search, &config());

    let context = client.get_context("anything", 3).await;
    assert!(context.starts_with("Source 1: Result 1\nContent of result 1.\nURL: https://example.com/1"));
    assert!(context.contains("\n\nSource 2: Result 2"));

    let queries = search.queries().await;
    assert_eq!(queries[0], ("anything".to_string(), SearchDepth::Advanced, 3));
}
