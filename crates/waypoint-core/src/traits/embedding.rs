// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::WaypointError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for turning text into fixed-length vectors.
///
/// Must be deterministic for identical input.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds each text, returning one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, WaypointError>;
}
