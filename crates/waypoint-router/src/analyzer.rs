// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid intent analysis: rules first, adjudicator when they are unsure.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use strum::Display;
use waypoint_core::{Domain, Intent};

use crate::adjudicator::Adjudicator;
use crate::features::QueryFeatures;
use crate::rules::{self, Verdict};

/// Which stage produced the final intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisSource {
    RuleEngine,
    Adjudicator,
}

/// Outcome of [`QueryAnalyzer::analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub intent: Intent,
    pub confidence: f32,
    pub source: AnalysisSource,
    pub features: QueryFeatures,
    /// Wall time spent analyzing, serialized as fractional seconds.
    #[serde(serialize_with = "as_secs")]
    pub latency: Duration,
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Map an adjudicated domain onto an intent.
///
/// Open-domain questions get reasoning; anything in a specialist domain is
/// answered internally, where an adapter may apply.
pub fn intent_for_domain(domain: &Domain) -> Intent {
    if domain.is_general() {
        Intent::ComplexReasoning
    } else {
        Intent::SimpleInternal
    }
}

/// Hybrid intent classifier.
///
/// Every query goes through feature extraction and the ordered rules first.
/// Only when the rules are ambiguous, or decide with a confidence below the
/// configured threshold, is the [`Adjudicator`] consulted; its domain verdict
/// is mapped to an intent with [`intent_for_domain`].
///
/// The rule path is a pure function of the query text. The adjudicator path
/// degrades instead of failing, so [`QueryAnalyzer::analyze`] always returns a
/// result.
pub struct QueryAnalyzer {
    adjudicator: Adjudicator,
    threshold: f32,
}

impl QueryAnalyzer {
    /// `threshold` is the rule confidence below which the adjudicator is asked.
    pub fn new(adjudicator: Adjudicator, threshold: f32) -> Self {
        Self {
            adjudicator,
            threshold,
        }
    }

    /// Classify a query. Never fails.
    pub async fn analyze(&self, query: &str) -> AnalysisResult {
        let start = Instant::now();
        let features = QueryFeatures::extract(query);
        let verdict = rules::evaluate(&features);

        let (intent, confidence, source) = match verdict {
            Verdict::Decided { intent, confidence } if confidence >= self.threshold => {
                (intent, confidence, AnalysisSource::RuleEngine)
            }
            _ => {
                tracing::debug!(
                    rule_confidence = verdict.confidence(),
                    "rules inconclusive, asking adjudicator"
                );
                let (domain, confidence) = self.adjudicator.classify(query).await;
                waypoint_prometheus::record_domain_classification(domain.as_str(), "adjudicator");
                (
                    intent_for_domain(&domain),
                    confidence,
                    AnalysisSource::Adjudicator,
                )
            }
        };

        waypoint_prometheus::record_confidence(confidence);
        tracing::debug!(%intent, confidence, %source, "query analyzed");

        AnalysisResult {
            intent,
            confidence,
            source,
            features,
            latency: start.elapsed(),
        }
    }
}
