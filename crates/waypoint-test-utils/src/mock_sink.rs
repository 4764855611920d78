// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction sink and content moderator mocks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use waypoint_core::{
    AdapterType, ContentModerator, Interaction, InteractionSink, PluginAdapter, WaypointError,
};

/// Keeps every logged interaction in memory.
#[derive(Clone, Default)]
pub struct RecordingSink {
    interactions: Arc<Mutex<Vec<Interaction>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn interactions(&self) -> Vec<Interaction> {
        self.interactions.lock().await.clone()
    }

    /// Intent labels in logging order.
    pub async fn intents(&self) -> Vec<String> {
        self.interactions
            .lock()
            .await
            .iter()
            .map(|i| i.intent.clone())
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for RecordingSink {
    fn name(&self) -> &str {
        "recording-sink"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Sink
    }
}

#[async_trait]
impl InteractionSink for RecordingSink {
    async fn log_interaction(&self, interaction: Interaction) {
        self.interactions.lock().await.push(interaction);
    }
}

/// Rejects text containing any blocked word (case-insensitive).
pub struct MockModerator {
    blocked: Vec<String>,
}

impl MockModerator {
    pub fn blocking<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl PluginAdapter for MockModerator {
    fn name(&self) -> &str {
        "mock-moderator"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Moderation
    }
}

#[async_trait]
impl ContentModerator for MockModerator {
    async fn moderate(&self, text: &str) -> Result<(), WaypointError> {
        let lower = text.to_lowercase();
        match self.blocked.iter().find(|w| lower.contains(w.as_str())) {
            Some(word) => Err(WaypointError::PolicyRejection {
                reason: format!("blocked term `{word}`"),
            }),
            None => Ok(()),
        }
    }
}
