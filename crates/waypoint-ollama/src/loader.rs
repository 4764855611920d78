// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter loading for Ollama-served fine-tunes.
//!
//! Ollama serves a LoRA adapter as its own model tag (built from a Modelfile
//! with an `ADAPTER` line). Loading checks that the adapter directory is
//! present and binds a generator to the configured tag.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use waypoint_config::model::AdapterSpecConfig;
use waypoint_core::{AdapterLoader, Domain, GenerationBackend, WaypointError};

use crate::backends::OllamaGenerator;
use crate::client::OllamaClient;

pub struct OllamaAdapterLoader {
    client: OllamaClient,
    models: HashMap<Domain, String>,
}

impl OllamaAdapterLoader {
    pub fn new(client: OllamaClient, adapters: &[AdapterSpecConfig]) -> Self {
        let models = adapters
            .iter()
            .map(|a| (Domain::new(a.domain.as_str()), a.model.clone()))
            .collect();
        Self { client, models }
    }
}

#[async_trait]
impl AdapterLoader for OllamaAdapterLoader {
    async fn load(
        &self,
        domain: &Domain,
        path: &Path,
    ) -> Result<Arc<dyn GenerationBackend>, WaypointError> {
        let model = self.models.get(domain).ok_or_else(|| {
            WaypointError::Config(format!("no adapter model configured for domain `{domain}`"))
        })?;

        let present = tokio::fs::try_exists(path).await.unwrap_or(false);
        if !present {
            return Err(WaypointError::Config(format!(
                "adapter path {} does not exist",
                path.display()
            )));
        }

        tracing::info!(%domain, model = %model, path = %path.display(), "adapter bound");
        Ok(Arc::new(OllamaGenerator::new(self.client.clone(), model.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use waypoint_config::model::OllamaConfig;
    use waypoint_core::PluginAdapter;

    use super::*;

    fn loader() -> OllamaAdapterLoader {
        let client = OllamaClient::new(&OllamaConfig::default()).unwrap();
        OllamaAdapterLoader::new(
            client,
            &[AdapterSpecConfig {
                domain: "Code".into(),
                path: "unused".into(),
                model: "code-lora".into(),
            }],
        )
    }

    #[tokio::test]
    async fn binds_generator_to_configured_model() {
        let dir = tempfile::tempdir().unwrap();
        let backend = loader().load(&Domain::CODE, dir.path()).await.unwrap();
        assert_eq!(backend.name(), "ollama-generate:code-lora");
    }

    #[tokio::test]
    async fn missing_path_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = loader().load(&Domain::CODE, &missing).await.err().unwrap();
        assert!(matches!(err, WaypointError::Config(_)));
    }

    #[tokio::test]
    async fn unknown_domain_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader().load(&Domain::LEGAL, dir.path()).await.err().unwrap();
        assert!(err.to_string().contains("legal"));
    }
}
