// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an Ollama-compatible server.
//!
//! Provides [`OllamaClient`], which posts JSON to the `/api/*` endpoints and
//! retries transient errors (429, 500, 503) once after a one second delay.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use waypoint_config::model::OllamaConfig;
use waypoint_core::WaypointError;

use crate::types::{
    ApiError, ChatMessage, ChatRequest, ChatResponse, EmbedRequest, EmbedResponse,
    GenerateRequest, GenerateResponse, ModelOptions,
};

const SERVICE: &str = "ollama";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self, WaypointError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WaypointError::external(SERVICE, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single-turn chat completion.
    pub async fn chat(
        &self,
        model: &str,
        prompt: &str,
        options: ModelOptions,
    ) -> Result<String, WaypointError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
            stream: false,
            options,
        };
        let response: ChatResponse = self.post("/api/chat", &request).await?;
        Ok(response.message.content)
    }

    /// Raw prompt completion.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: ModelOptions,
    ) -> Result<String, WaypointError> {
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
            options,
        };
        let response: GenerateResponse = self.post("/api/generate", &request).await?;
        Ok(response.response)
    }

    /// One embedding per input, in input order.
    pub async fn embed(&self, model: &str, input: &[String]) -> Result<Vec<Vec<f32>>, WaypointError> {
        let request = EmbedRequest {
            model: model.to_string(),
            input: input.to_vec(),
        };
        let response: EmbedResponse = self.post("/api/embed", &request).await?;
        if response.embeddings.len() != input.len() {
            return Err(WaypointError::external_msg(
                SERVICE,
                format!(
                    "expected {} embeddings, got {}",
                    input.len(),
                    response.embeddings.len()
                ),
            ));
        }
        Ok(response.embeddings)
    }

    /// Reachability probe against `/api/tags`.
    pub async fn ping(&self) -> Result<(), WaypointError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| WaypointError::external(SERVICE, e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(WaypointError::external_msg(
                SERVICE,
                format!("health probe returned {}", response.status()),
            ))
        }
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, WaypointError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| WaypointError::external(SERVICE, e))?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "ollama response received");

            if status.is_success() {
                return response
                    .json::<R>()
                    .await
                    .map_err(|e| WaypointError::external(SERVICE, e));
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api) => format!("Ollama API error ({status}): {}", api.error),
                Err(_) => format!("API returned {status}: {body}"),
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(WaypointError::external_msg(SERVICE, message));
                continue;
            }
            return Err(WaypointError::external_msg(SERVICE, message));
        }

        Err(last_error
            .unwrap_or_else(|| WaypointError::external_msg(SERVICE, "request failed after retries")))
    }

    #[cfg(test)]
    pub(crate) fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
