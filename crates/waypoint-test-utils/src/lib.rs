// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators for Waypoint tests.
//!
//! Every mock is deterministic, needs no network, and records the calls it
//! receives so tests can assert on call counts and prompts.

pub mod mock_chat;
pub mod mock_embedder;
pub mod mock_loader;
pub mod mock_search;
pub mod mock_sink;

pub use mock_chat::{MockChat, MockGenerator};
pub use mock_embedder::MockEmbedder;
pub use mock_loader::MockLoader;
pub use mock_search::MockSearch;
pub use mock_sink::{MockModerator, RecordingSink};

/// Search result with predictable fields derived from `n`.
pub fn sample_result(n: usize) -> waypoint_core::SearchResult {
    waypoint_core::SearchResult {
        title: format!("Result {n}"),
        content: format!("Content of result {n}."),
        url: format!("https://example.com/{n}"),
        score: 1.0 / (n as f64 + 1.0),
    }
}
