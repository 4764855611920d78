// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External retrieval for the Waypoint router.
//!
//! [`RetrievalClient`] wraps any [`waypoint_core::SearchProvider`] with a
//! bounded result cache, a sliding-window rate limit and exponential-backoff
//! retry. [`TavilyProvider`] is the production provider.

pub mod cache;
pub mod client;
pub mod rate_limit;
pub mod tavily;

pub use cache::{EvictionPolicy, Fifo, Lru, ResultCache};
pub use client::{
    backoff_for, cache_key, format_context, RetrievalClient, RetrievalStats, MAX_BACKOFF,
    NO_CONTEXT,
};
pub use rate_limit::RateWindow;
pub use tavily::TavilyProvider;
