// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search provider trait.

use async_trait::async_trait;

use crate::error::WaypointError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{SearchDepth, SearchResult};

/// External web search used for retrieval-augmented answers.
#[async_trait]
pub trait SearchProvider: PluginAdapter {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, WaypointError>;
}
