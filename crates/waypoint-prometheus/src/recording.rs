// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Recording goes through the metrics-rs facade. Without an installed
//! recorder every call is a no-op, so library crates call these freely.

use metrics::{describe_counter, describe_histogram};

pub const CLASSIFICATION_TOTAL: &str = "waypoint_classification_total";
pub const CACHE_HITS_TOTAL: &str = "waypoint_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "waypoint_cache_misses_total";
pub const ADAPTER_USAGE_TOTAL: &str = "waypoint_adapter_usage_total";
pub const DOMAIN_CLASSIFICATIONS_TOTAL: &str = "waypoint_domain_classifications_total";
pub const CLASSIFICATION_CONFIDENCE: &str = "waypoint_classification_confidence";
pub const ROUTE_LATENCY_SECONDS: &str = "waypoint_route_latency_seconds";

/// Outcome label for classification accuracy tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
}

impl Outcome {
    fn as_label(self) -> &'static str {
        match self {
            Outcome::TruePositive => "tp",
            Outcome::FalsePositive => "fp",
            Outcome::FalseNegative => "fn",
        }
    }
}

/// Register all Waypoint metric descriptions.
///
/// Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        CLASSIFICATION_TOTAL,
        "Intent classifications checked against ground truth"
    );
    describe_counter!(CACHE_HITS_TOTAL, "Cache lookups served from memory");
    describe_counter!(CACHE_MISSES_TOTAL, "Cache lookups that fell through");
    describe_counter!(ADAPTER_USAGE_TOTAL, "Responses generated by a domain adapter");
    describe_counter!(
        DOMAIN_CLASSIFICATIONS_TOTAL,
        "Domain decisions by classification method"
    );
    describe_histogram!(
        CLASSIFICATION_CONFIDENCE,
        "Confidence of intent classifications"
    );
    describe_histogram!(ROUTE_LATENCY_SECONDS, "End-to-end routing latency in seconds");
}

/// Record one ground-truth comparison for `intent`.
pub fn record_classification(intent: &str, outcome: Outcome) {
    metrics::counter!(
        CLASSIFICATION_TOTAL,
        "intent" => intent.to_string(),
        "outcome" => outcome.as_label()
    )
    .increment(1);
}

pub fn record_cache_hit(cache_type: &'static str) {
    metrics::counter!(CACHE_HITS_TOTAL, "cache_type" => cache_type).increment(1);
}

pub fn record_cache_miss(cache_type: &'static str) {
    metrics::counter!(CACHE_MISSES_TOTAL, "cache_type" => cache_type).increment(1);
}

pub fn record_adapter_usage(domain: &str) {
    metrics::counter!(ADAPTER_USAGE_TOTAL, "domain" => domain.to_string()).increment(1);
}

/// Record a domain decision; `method` is e.g. `semantic` or `adjudicator`.
pub fn record_domain_classification(domain: &str, method: &'static str) {
    metrics::counter!(
        DOMAIN_CLASSIFICATIONS_TOTAL,
        "domain" => domain.to_string(),
        "method" => method
    )
    .increment(1);
}

pub fn record_confidence(confidence: f32) {
    metrics::histogram!(CLASSIFICATION_CONFIDENCE).record(f64::from(confidence));
}

pub fn record_route_latency(mode: &str, seconds: f64) {
    metrics::histogram!(ROUTE_LATENCY_SECONDS, "mode" => mode.to_string()).record(seconds);
}

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::PrometheusBuilder;

    use super::*;

    #[test]
    fn recorded_series_render_with_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_classification("external_search", Outcome::TruePositive);
            record_classification("simple_internal", Outcome::FalseNegative);
            record_cache_hit("retrieval");
            record_cache_miss("retrieval");
            record_adapter_usage("code");
            record_domain_classification("medical", "semantic");
        });

        let text = handle.render();
        assert!(text.contains(
            r#"waypoint_classification_total{intent="external_search",outcome="tp"} 1"#
        ));
        assert!(text.contains(r#"outcome="fn""#));
        assert!(text.contains(r#"waypoint_cache_hits_total{cache_type="retrieval"} 1"#));
        assert!(text.contains(r#"waypoint_cache_misses_total{cache_type="retrieval"} 1"#));
        assert!(text.contains(r#"waypoint_adapter_usage_total{domain="code"} 1"#));
        assert!(text.contains(r#"method="semantic""#));
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_cache_hit("retrieval");
        record_route_latency("base-model", 0.25);
        record_confidence(0.9);
    }
}
