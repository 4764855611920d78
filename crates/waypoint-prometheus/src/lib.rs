// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for the Waypoint query router.
//!
//! The recorder is installed by the binary; everything else records
//! through [`recording`] and the metrics-rs facade.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use waypoint_core::{AdapterType, PluginAdapter, WaypointError};

pub use recording::{
    record_adapter_usage, record_cache_hit, record_cache_miss, record_classification,
    record_confidence, record_domain_classification, record_route_latency, Outcome,
};

/// Owns the global Prometheus recorder handle.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the Prometheus recorder globally and register descriptions.
    ///
    /// Only one recorder may be installed per process; a second call fails.
    pub fn new() -> Result<Self, WaypointError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            WaypointError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();
        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Render collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }
}
