// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content moderation gate.

use async_trait::async_trait;

use crate::error::WaypointError;
use crate::traits::adapter::PluginAdapter;

/// Vetoes queries before any downstream call is made.
#[async_trait]
pub trait ContentModerator: PluginAdapter {
    /// Returns `Err(WaypointError::PolicyRejection)` when the text must not
    /// be processed.
    async fn moderate(&self, text: &str) -> Result<(), WaypointError>;
}
