// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data collector for retrieval-backed interactions.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::Interaction;

/// Fire-and-forget recorder of interactions worth keeping for fine-tuning.
///
/// Implementations swallow and log their own failures.
#[async_trait]
pub trait InteractionSink: PluginAdapter {
    async fn log_interaction(&self, interaction: Interaction);
}
