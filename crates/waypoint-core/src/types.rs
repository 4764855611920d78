// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the routing stages and collaborator traits.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Routing decision produced by query analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Answerable by the base model or a domain adapter.
    SimpleInternal,
    /// Needs chain-of-thought reasoning.
    ComplexReasoning,
    /// Needs fresh external context (retrieval-augmented generation).
    ExternalSearch,
}

/// Knowledge domain used to pick a fine-tuned adapter.
///
/// Open set: the well-known domains are associated constants, any other
/// name coming from configuration is equally valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Cow<'static, str>);

impl Domain {
    pub const CODE: Domain = Domain(Cow::Borrowed("code"));
    pub const MEDICAL: Domain = Domain(Cow::Borrowed("medical"));
    pub const LEGAL: Domain = Domain(Cow::Borrowed("legal"));
    pub const GENERAL: Domain = Domain(Cow::Borrowed("general"));

    /// Creates a domain from any name. Names are lowercased.
    pub fn new(name: impl Into<String>) -> Self {
        Domain(Cow::Owned(name.into().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_general(&self) -> bool {
        self.as_str() == "general"
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Domain::new(name)
    }
}

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the role a collaborator plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Chat,
    Generation,
    Embedding,
    Search,
    Sink,
    Moderation,
    Observability,
}

/// One hit returned by the web search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: f64,
}

/// How hard the search provider should dig.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

/// Sampling options for a chat-style LLM call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Sampling parameters for the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.5,
            top_p: 0.85,
            repetition_penalty: 1.1,
        }
    }
}

/// A completed retrieval-backed interaction, handed to the data collector.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub query: String,
    pub context: String,
    pub response: String,
    pub intent: String,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    pub fn new(
        query: impl Into<String>,
        context: impl Into<String>,
        response: impl Into<String>,
        intent: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            context: context.into(),
            response: response.into(),
            intent: intent.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::ExternalSearch).unwrap();
        assert_eq!(json, "\"external_search\"");
        assert_eq!(Intent::SimpleInternal.to_string(), "simple_internal");
        assert_eq!(
            Intent::from_str("complex_reasoning").unwrap(),
            Intent::ComplexReasoning
        );
    }

    #[test]
    fn domain_constants_equal_owned_names() {
        assert_eq!(Domain::CODE, Domain::new("code"));
        assert_eq!(Domain::new("Medical"), Domain::MEDICAL);
        assert!(Domain::GENERAL.is_general());
        assert!(!Domain::LEGAL.is_general());
    }

    #[test]
    fn domain_orders_lexicographically() {
        let mut domains = vec![Domain::new("medical"), Domain::CODE, Domain::GENERAL];
        domains.sort();
        let names: Vec<&str> = domains.iter().map(Domain::as_str).collect();
        assert_eq!(names, vec!["code", "general", "medical"]);
    }

    #[test]
    fn search_result_tolerates_missing_fields() {
        let r: SearchResult = serde_json::from_str(r#"{"title":"t","url":"u"}"#).unwrap();
        assert_eq!(r.content, "");
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn search_depth_defaults_to_advanced() {
        assert_eq!(SearchDepth::default(), SearchDepth::Advanced);
        assert_eq!(SearchDepth::Basic.to_string(), "basic");
    }
}
