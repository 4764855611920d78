// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-style LLM backend used by the adjudicator and the reasoner.

use async_trait::async_trait;

use crate::error::WaypointError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChatOptions;

/// A single-turn chat completion backend.
///
/// Implementations may fail on network errors or timeouts; callers in the
/// routing core degrade rather than propagate.
#[async_trait]
pub trait ChatBackend: PluginAdapter {
    /// Sends `prompt` as a user message and returns the assistant text.
    async fn chat(&self, prompt: &str, options: ChatOptions) -> Result<String, WaypointError>;
}
