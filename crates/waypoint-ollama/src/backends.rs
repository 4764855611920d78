// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait implementations over [`OllamaClient`].
//!
//! Each backend pins one model tag; they share the client's connection pool.

use async_trait::async_trait;

use waypoint_core::{
    AdapterType, ChatBackend, ChatOptions, EmbeddingAdapter, GenerationBackend,
    GenerationParams, HealthStatus, PluginAdapter, WaypointError,
};

use crate::client::OllamaClient;
use crate::types::ModelOptions;

async fn probe(client: &OllamaClient) -> Result<HealthStatus, WaypointError> {
    Ok(match client.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    })
}

/// Chat model used by the adjudicator and the reasoner.
#[derive(Debug, Clone)]
pub struct OllamaChat {
    client: OllamaClient,
    model: String,
}

impl OllamaChat {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for OllamaChat {
    fn name(&self) -> &str {
        "ollama-chat"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, WaypointError> {
        probe(&self.client).await
    }
}

#[async_trait]
impl ChatBackend for OllamaChat {
    async fn chat(&self, prompt: &str, options: ChatOptions) -> Result<String, WaypointError> {
        let options = ModelOptions {
            temperature: Some(options.temperature),
            num_predict: Some(options.max_tokens),
            ..ModelOptions::default()
        };
        self.client.chat(&self.model, prompt, options).await
    }
}

/// Text generator bound to one model tag: the base model or an adapter.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    name: String,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            name: format!("ollama-generate:{model}"),
            client,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for OllamaGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, WaypointError> {
        probe(&self.client).await
    }
}

#[async_trait]
impl GenerationBackend for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, WaypointError> {
        let options = ModelOptions {
            temperature: Some(params.temperature),
            num_predict: Some(params.max_new_tokens),
            top_p: Some(params.top_p),
            repeat_penalty: Some(params.repetition_penalty),
        };
        self.client.generate(&self.model, prompt, options).await
    }
}

/// Sentence embedder for the semantic router.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama-embed"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, WaypointError> {
        probe(&self.client).await
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, WaypointError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.client.embed(&self.model, texts).await
    }
}
