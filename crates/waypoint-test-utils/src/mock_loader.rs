// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapter loader.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use waypoint_core::{AdapterLoader, Domain, GenerationBackend, WaypointError};

use crate::mock_chat::MockGenerator;

/// Loads a [`MockGenerator`] per domain that replies `"{domain} adapter answer"`.
#[derive(Clone, Default)]
pub struct MockLoader {
    loads: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every load, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `n` loads.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Load attempts so far, including failed ones.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn reply_for(domain: &Domain) -> String {
        format!("{domain} adapter answer")
    }
}

#[async_trait]
impl AdapterLoader for MockLoader {
    async fn load(
        &self,
        domain: &Domain,
        path: &Path,
    ) -> Result<Arc<dyn GenerationBackend>, WaypointError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(WaypointError::external_msg(
                "mock-loader",
                format!("could not load {}", path.display()),
            ));
        }
        tracing::debug!(%domain, path = %path.display(), "mock adapter loaded");
        Ok(Arc::new(MockGenerator::named(
            format!("{domain}-adapter"),
            Self::reply_for(domain),
        )))
    }
}
