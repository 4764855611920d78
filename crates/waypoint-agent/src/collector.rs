// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default interaction sink.
//!
//! Emits each interaction as a structured `tracing` event on the
//! `waypoint::interactions` target, so collection can be routed or filtered
//! with the subscriber instead of a bespoke file writer.

use async_trait::async_trait;

use waypoint_core::{AdapterType, Interaction, InteractionSink, PluginAdapter};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl PluginAdapter for TracingSink {
    fn name(&self) -> &str {
        "tracing-sink"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Sink
    }
}

#[async_trait]
impl InteractionSink for TracingSink {
    async fn log_interaction(&self, interaction: Interaction) {
        tracing::info!(
            target: "waypoint::interactions",
            intent = %interaction.intent,
            query = %interaction.query,
            context_chars = interaction.context.len(),
            response = %interaction.response,
            timestamp = %interaction.timestamp.to_rfc3339(),
            "interaction collected"
        );
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[traced_test]
    #[tokio::test]
    async fn logs_interaction_fields() {
        TracingSink
            .log_interaction(Interaction::new("q", "ctx", "answer", "rag-external"))
            .await;
        assert!(logs_contain("interaction collected"));
        assert!(logs_contain("rag-external"));
    }
}
