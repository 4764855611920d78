// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations and service wiring.

use std::sync::Arc;

use tracing::{info, warn};
use waypoint_agent::{Backends, Orchestrator};
use waypoint_config::WaypointConfig;
use waypoint_core::{Intent, SearchProvider, WaypointError};
use waypoint_ollama::{
    OllamaAdapterLoader, OllamaChat, OllamaClient, OllamaEmbedder, OllamaGenerator,
};
use waypoint_prometheus::PrometheusAdapter;
use waypoint_retrieval::TavilyProvider;

const REDACTED: &str = "[REDACTED]";

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("waypoint={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Build every service once and hand them to the orchestrator.
fn build_orchestrator(config: &WaypointConfig) -> Result<Orchestrator, WaypointError> {
    let client = OllamaClient::new(&config.ollama)?;

    let search: Option<Arc<dyn SearchProvider>> = if config.tavily.api_key.is_some() {
        Some(Arc::new(TavilyProvider::new(&config.tavily)?))
    } else {
        warn!("tavily.api_key not set; retrieval routes will fail");
        None
    };

    let backends = Backends {
        chat: Arc::new(OllamaChat::new(client.clone(), &config.ollama.chat_model)),
        embedder: Arc::new(OllamaEmbedder::new(
            client.clone(),
            &config.ollama.embedding_model,
        )),
        base: Arc::new(OllamaGenerator::new(
            client.clone(),
            &config.ollama.generation_model,
        )),
        loader: Arc::new(OllamaAdapterLoader::new(client, &config.adapters)),
        search,
    };

    let orchestrator = Orchestrator::new(config, backends);
    info!(
        adapters = ?orchestrator.adapters().available_domains(),
        "orchestrator ready"
    );
    Ok(orchestrator)
}

pub async fn run_route(
    config: &WaypointConfig,
    query: &str,
    expect: Option<Intent>,
    print_metrics: bool,
) -> Result<(), WaypointError> {
    let metrics = if print_metrics {
        Some(PrometheusAdapter::new()?)
    } else {
        None
    };

    let orchestrator = build_orchestrator(config)?;
    let routed = orchestrator.route(query, expect).await?;
    print_json(&routed)?;

    if let Some(metrics) = metrics {
        eprintln!("{}", metrics.render());
    }
    Ok(())
}

pub async fn run_analyze(config: &WaypointConfig, query: &str) -> Result<(), WaypointError> {
    let orchestrator = build_orchestrator(config)?;
    let analysis = orchestrator.analyzer().analyze(query).await;
    print_json(&analysis)
}

pub fn run_config(config: &WaypointConfig) -> Result<(), WaypointError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| WaypointError::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn redacted(config: &WaypointConfig) -> WaypointConfig {
    let mut config = config.clone();
    if config.tavily.api_key.is_some() {
        config.tavily.api_key = Some(REDACTED.to_string());
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), WaypointError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| WaypointError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}
