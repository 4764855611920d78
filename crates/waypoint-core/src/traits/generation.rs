// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text generation backends (base model and fine-tuned adapters).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WaypointError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Domain, GenerationParams};

/// Raw text generation (base model or a loaded adapter).
#[async_trait]
pub trait GenerationBackend: PluginAdapter {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, WaypointError>;
}

/// Materializes a generation handle for a domain adapter stored at `path`.
///
/// Loading may be expensive; the adapter registry calls it at most once per
/// domain.
#[async_trait]
pub trait AdapterLoader: Send + Sync + 'static {
    async fn load(
        &self,
        domain: &Domain,
        path: &Path,
    ) -> Result<Arc<dyn GenerationBackend>, WaypointError>;
}
