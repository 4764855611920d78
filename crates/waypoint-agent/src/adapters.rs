// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain adapter registry.
//!
//! Adapters are loaded on first use and kept for the life of the process.
//! Each domain has its own `OnceCell`, so concurrent first callers share a
//! single load, and a failed load leaves the cell empty for a later retry.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use waypoint_config::model::{AdapterSpecConfig, GenerationConfig};
use waypoint_core::{
    with_timeout, AdapterLoader, Domain, GenerationBackend, GenerationParams, WaypointError,
};

type Handle = Arc<dyn GenerationBackend>;

/// Wrap a user prompt in the instruction format the adapters were tuned on.
pub fn instruction_prompt(prompt: &str) -> String {
    format!("Instruction: {prompt}\nResponse:")
}

/// Domain to fine-tuned adapter table with lazy, load-once handles.
///
/// Availability is a filesystem check against the configured path. The
/// first [`generate_with_adapter`](Self::generate_with_adapter) for a domain
/// loads its handle through the [`AdapterLoader`]; concurrent first callers
/// wait on the same load and share its result. A failed load leaves the
/// domain unloaded, so a later call tries again.
pub struct AdapterRegistry {
    paths: BTreeMap<Domain, PathBuf>,
    handles: DashMap<Domain, Arc<OnceCell<Handle>>>,
    loader: Arc<dyn AdapterLoader>,
    sampling: GenerationParams,
    timeout: Duration,
}

impl AdapterRegistry {
    /// Build the table from `[[adapters]]` entries. Nothing is loaded yet.
    ///
    /// `generation` supplies the sampling parameters for every adapter call;
    /// `timeout` bounds both loading and generation.
    pub fn new(
        adapters: &[AdapterSpecConfig],
        loader: Arc<dyn AdapterLoader>,
        generation: &GenerationConfig,
        timeout: Duration,
    ) -> Self {
        let paths = adapters
            .iter()
            .map(|a| (Domain::new(a.domain.as_str()), PathBuf::from(&a.path)))
            .collect();
        Self {
            paths,
            handles: DashMap::new(),
            loader,
            sampling: generation.params(),
            timeout,
        }
    }

    /// The domain is configured and its adapter directory exists.
    pub fn has_adapter(&self, domain: &Domain) -> bool {
        self.paths.get(domain).is_some_and(|path| path.exists())
    }

    /// Configured domains whose adapter directory exists, sorted.
    pub fn available_domains(&self) -> Vec<Domain> {
        self.paths
            .keys()
            .filter(|d| self.has_adapter(d))
            .cloned()
            .collect()
    }

    /// Domains whose adapter is already loaded.
    pub fn loaded_domains(&self) -> Vec<Domain> {
        let mut loaded: Vec<Domain> = self
            .handles
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        loaded.sort();
        loaded
    }

    /// Generate with the adapter for `domain`, loading it on first use.
    pub async fn generate_with_adapter(
        &self,
        domain: &Domain,
        prompt: &str,
        max_new_tokens: u32,
    ) -> Result<String, WaypointError> {
        let handle = self.handle(domain).await?;
        let params = GenerationParams {
            max_new_tokens,
            ..self.sampling
        };
        let instruction = instruction_prompt(prompt);

        let output = with_timeout(
            "adapter",
            self.timeout,
            handle.generate(&instruction, &params),
        )
        .await?;

        waypoint_prometheus::record_adapter_usage(domain.as_str());
        let output = output.strip_prefix(instruction.as_str()).unwrap_or(&output);
        Ok(output.trim().to_string())
    }

    async fn handle(&self, domain: &Domain) -> Result<Handle, WaypointError> {
        let Some(path) = self.paths.get(domain).filter(|p| p.exists()) else {
            return Err(WaypointError::Config(format!(
                "no adapter available for domain `{domain}`"
            )));
        };

        // Clone the cell out so no map shard lock is held across the load.
        let cell = self.handles.entry(domain.clone()).or_default().clone();

        let loader = &self.loader;
        let timeout = self.timeout;
        let handle = cell
            .get_or_try_init(|| async move {
                info!(%domain, path = %path.display(), "loading adapter");
                with_timeout("adapter", timeout, loader.load(domain, path)).await
            })
            .await?;
        debug!(%domain, "adapter handle ready");
        Ok(Arc::clone(handle))
    }
}
