// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! All problems are collected; validation never stops at the first one.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::WaypointConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest accepted `retrieval.max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// Validate a deserialized configuration.
pub fn validate_config(config: &WaypointConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::invalid(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    check_url(&mut errors, "ollama.base_url", &config.ollama.base_url);
    check_url(&mut errors, "tavily.base_url", &config.tavily.base_url);

    if config.ollama.timeout_secs == 0 {
        errors.push(ConfigError::invalid("ollama.timeout_secs must be at least 1"));
    }
    if config.tavily.timeout_secs == 0 {
        errors.push(ConfigError::invalid("tavily.timeout_secs must be at least 1"));
    }
    if let Some(key) = &config.tavily.api_key
        && key.trim().is_empty()
    {
        errors.push(ConfigError::invalid(
            "tavily.api_key is set but empty; remove it to disable retrieval",
        ));
    }

    let retrieval = &config.retrieval;
    for (name, value) in [
        ("retrieval.cache_capacity", retrieval.cache_capacity),
        (
            "retrieval.max_requests_per_window",
            retrieval.max_requests_per_window,
        ),
        ("retrieval.max_results", retrieval.max_results),
        ("retrieval.max_retries", retrieval.max_retries as usize),
        ("retrieval.window_secs", retrieval.window_secs as usize),
    ] {
        if value == 0 {
            errors.push(ConfigError::invalid(format!("{name} must be at least 1")));
        }
    }

    if retrieval.max_retries > MAX_RETRIES {
        errors.push(ConfigError::invalid(format!(
            "retrieval.max_retries must be at most {MAX_RETRIES}, got {}",
            retrieval.max_retries
        )));
    }

    let routing = &config.routing;
    if !(0.0..=1.0).contains(&routing.adjudication_threshold) {
        errors.push(ConfigError::invalid(format!(
            "routing.adjudication_threshold must be within [0.0, 1.0], got {}",
            routing.adjudication_threshold
        )));
    }
    if routing.known_domains.is_empty() {
        errors.push(ConfigError::invalid(
            "routing.known_domains must list at least one domain",
        ));
    }
    if !routing
        .known_domains
        .iter()
        .any(|d| d.eq_ignore_ascii_case("general"))
    {
        errors.push(ConfigError::invalid(
            "routing.known_domains must include `general`",
        ));
    }
    if routing.exemplars.values().all(Vec::is_empty) {
        errors.push(ConfigError::invalid(
            "routing.exemplars must contain at least one query",
        ));
    }
    for (domain, queries) in &routing.exemplars {
        if queries.iter().any(|q| q.trim().is_empty()) {
            errors.push(ConfigError::invalid(format!(
                "routing.exemplars.{domain} contains an empty query"
            )));
        }
    }

    for (name, value) in [
        ("reasoner.reasoning_temperature", config.reasoner.reasoning_temperature),
        ("reasoner.synthesis_temperature", config.reasoner.synthesis_temperature),
        ("routing.adjudicator_temperature", routing.adjudicator_temperature),
        ("generation.temperature", config.generation.temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            errors.push(ConfigError::invalid(format!(
                "{name} must be within [0.0, 2.0], got {value}"
            )));
        }
    }
    if !(0.0..=1.0).contains(&config.generation.top_p) || config.generation.top_p == 0.0 {
        errors.push(ConfigError::invalid(format!(
            "generation.top_p must be within (0.0, 1.0], got {}",
            config.generation.top_p
        )));
    }

    let mut seen = HashSet::new();
    for (i, adapter) in config.adapters.iter().enumerate() {
        let domain = adapter.domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
            errors.push(ConfigError::invalid(format!(
                "adapters[{i}].domain must not be empty"
            )));
        } else if domain == "general" {
            errors.push(ConfigError::invalid(format!(
                "adapters[{i}]: the general domain is served by the base model"
            )));
        } else if !seen.insert(domain.clone()) {
            errors.push(ConfigError::invalid(format!(
                "duplicate adapter for domain `{domain}`"
            )));
        }
        if adapter.path.trim().is_empty() {
            errors.push(ConfigError::invalid(format!(
                "adapters[{i}].path must not be empty"
            )));
        }
        if adapter.model.trim().is_empty() {
            errors.push(ConfigError::invalid(format!(
                "adapters[{i}].model must not be empty"
            )));
        }
    }

    if config.fallback.enabled && config.fallback.markers.iter().all(|m| m.trim().is_empty()) {
        errors.push(ConfigError::invalid(
            "fallback.markers must contain a non-empty marker when fallback is enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, name: &str, value: &str) {
    let value = value.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(ConfigError::invalid(format!(
            "{name} `{value}` must start with http:// or https://"
        )));
    }
}
