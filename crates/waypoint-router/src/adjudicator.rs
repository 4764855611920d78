// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM fallback classifier for queries the rules cannot settle.
//!
//! Asks the chat backend for a single domain label. The adjudicator never
//! fails: any backend error or timeout degrades to `(general, 0.5)`.

use std::sync::Arc;
use std::time::Duration;

use waypoint_config::model::RoutingConfig;
use waypoint_core::{with_timeout, ChatBackend, ChatOptions, Domain};

/// Confidence reported when the backend produced a reply.
pub const REPLY_CONFIDENCE: f32 = 0.95;

/// Confidence reported when the backend could not be reached.
pub const DEGRADED_CONFIDENCE: f32 = 0.5;

fn describe(domain: &str) -> &str {
    match domain {
        "code" => "Programming, software, algorithms, debugging, API development",
        "medical" => "Health, medicine, biology, symptoms, treatments, healthcare",
        "legal" => "Law, regulations, contracts, compliance, intellectual property",
        "general" => "Science, history, general knowledge, or anything else",
        other => other,
    }
}

/// Single-shot domain classifier backed by a chat model.
pub struct Adjudicator {
    chat: Arc<dyn ChatBackend>,
    domains: Vec<Domain>,
    options: ChatOptions,
    timeout: Duration,
}

impl Adjudicator {
    pub fn new(chat: Arc<dyn ChatBackend>, config: &RoutingConfig, timeout: Duration) -> Self {
        Self {
            chat,
            domains: config.known_domains.iter().map(Domain::new).collect(),
            options: ChatOptions {
                temperature: config.adjudicator_temperature,
                max_tokens: config.adjudicator_max_tokens,
            },
            timeout,
        }
    }

    /// Build the classification prompt for `query`.
    pub fn prompt(&self, query: &str) -> String {
        let categories: String = self
            .domains
            .iter()
            .map(|d| format!("- {d}: {}\n", describe(d.as_str())))
            .collect();
        let names: Vec<&str> = self.domains.iter().map(Domain::as_str).collect();

        format!(
            "You are a domain classifier. Classify the following query into EXACTLY ONE category.\n\n\
             Categories:\n{categories}\n\
             Query: \"{query}\"\n\n\
             Respond with ONLY the category name ({}). No explanation or extra text.",
            names.join(", ")
        )
    }

    /// Classify `query` into a known domain.
    pub async fn classify(&self, query: &str) -> (Domain, f32) {
        let prompt = self.prompt(query);
        let reply = with_timeout(
            "adjudicator",
            self.timeout,
            self.chat.chat(&prompt, self.options),
        )
        .await;

        match reply {
            Ok(text) => {
                let domain = self.parse_reply(&text);
                tracing::debug!(domain = %domain, reply = %text.trim(), "adjudicator verdict");
                (domain, REPLY_CONFIDENCE)
            }
            Err(e) => {
                tracing::warn!(error = %e, "adjudicator unavailable, defaulting to general");
                (Domain::GENERAL, DEGRADED_CONFIDENCE)
            }
        }
    }

    /// First configured domain whose name appears in the reply.
    fn parse_reply(&self, reply: &str) -> Domain {
        let reply = reply.trim().to_lowercase();
        self.domains
            .iter()
            .find(|d| reply.contains(d.as_str()))
            .cloned()
            .unwrap_or(Domain::GENERAL)
    }
}
