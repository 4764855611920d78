// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chain-of-thought reasoning and context synthesis.
//!
//! Both operations degrade to a fixed error text instead of failing, so a
//! backend outage still yields a response envelope.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use waypoint_config::model::ReasonerConfig;
use waypoint_core::{with_timeout, ChatBackend, ChatOptions};

pub const REASONING_FAILED: &str = "Error in reasoning process";

/// Output of [`Reasoner::reason`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningOutcome {
    pub reasoning: String,
    pub answer: String,
    /// Raw model output, or the error detail on failure.
    pub full_response: String,
}

fn reasoning_prompt(query: &str) -> String {
    format!(
        "You are a helpful AI assistant that thinks step-by-step.\n\n\
         For the following question, break down your reasoning into clear steps:\n\
         1. Understanding: Rephrase the question in your own words\n\
         2. Analysis: Identify key components and what's being asked\n\
         3. Reasoning: Think through the solution step-by-step\n\
         4. Answer: Provide the final answer\n\n\
         Question: {query}\n\n\
         Think carefully and show your reasoning:"
    )
}

fn synthesis_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the following information, provide a clear and concise answer.\n\n\
         Context:\n{context}\n\n\
         Question: {query}\n\n\
         Synthesize the information above and provide a comprehensive answer.\n\
         Cite your sources using [Source X] format where appropriate."
    )
}

/// Split a chain-of-thought reply into reasoning and answer.
///
/// An `Answer:` marker splits once; otherwise the last paragraph is the
/// answer. A single paragraph serves as both.
pub fn split_reasoning(full: &str) -> (String, String) {
    if let Some((reasoning, answer)) = full.split_once("Answer:") {
        return (reasoning.trim().to_string(), answer.trim().to_string());
    }
    match full.rsplit_once("\n\n") {
        Some((reasoning, answer)) => (reasoning.to_string(), answer.to_string()),
        None => (full.to_string(), full.to_string()),
    }
}

pub struct Reasoner {
    chat: Arc<dyn ChatBackend>,
    reasoning: ChatOptions,
    synthesis: ChatOptions,
    timeout: Duration,
}

impl Reasoner {
    pub fn new(chat: Arc<dyn ChatBackend>, config: &ReasonerConfig, timeout: Duration) -> Self {
        Self {
            chat,
            reasoning: ChatOptions {
                temperature: config.reasoning_temperature,
                max_tokens: config.reasoning_max_tokens,
            },
            synthesis: ChatOptions {
                temperature: config.synthesis_temperature,
                max_tokens: config.synthesis_max_tokens,
            },
            timeout,
        }
    }

    /// Answer `query` with explicit step-by-step reasoning.
    pub async fn reason(&self, query: &str) -> ReasoningOutcome {
        let prompt = reasoning_prompt(query);
        let reply = with_timeout(
            "reasoner",
            self.timeout,
            self.chat.chat(&prompt, self.reasoning),
        )
        .await;

        match reply {
            Ok(full) => {
                let (reasoning, answer) = split_reasoning(&full);
                debug!(
                    reasoning_chars = reasoning.len(),
                    answer_chars = answer.len(),
                    "reasoning complete"
                );
                ReasoningOutcome {
                    reasoning,
                    answer,
                    full_response: full,
                }
            }
            Err(e) => {
                warn!(error = %e, "reasoning failed");
                ReasoningOutcome {
                    reasoning: String::new(),
                    answer: REASONING_FAILED.to_string(),
                    full_response: e.to_string(),
                }
            }
        }
    }

    /// Answer `query` from retrieved `context`, citing sources.
    pub async fn synthesize_with_context(&self, query: &str, context: &str) -> String {
        let prompt = synthesis_prompt(query, context);
        let reply = with_timeout(
            "reasoner",
            self.timeout,
            self.chat.chat(&prompt, self.synthesis),
        )
        .await;

        match reply {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "synthesis failed");
                format!("Error synthesizing response: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use waypoint_test_utils::MockChat;

    use super::*;

    fn reasoner(chat: &MockChat) -> Reasoner {
        Reasoner::new(
            Arc::new(chat.clone()),
            &ReasonerConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn answer_marker_splits_once() {
        let (reasoning, answer) =
            split_reasoning("1. Understanding: x\n3. Reasoning: y\nAnswer: 42. Answer: not this");
        assert_eq!(reasoning, "1. Understanding: x\n3. Reasoning: y");
        assert_eq!(answer, "42. Answer: not this");
    }

    #[test]
    fn last_paragraph_is_answer_without_marker() {
        let (reasoning, answer) = split_reasoning("step one\n\nstep two\n\nforty-two");
        assert_eq!(reasoning, "step one\n\nstep two");
        assert_eq!(answer, "forty-two");
    }

    #[test]
    fn single_paragraph_is_both() {
        let (reasoning, answer) = split_reasoning("just this");
        assert_eq!(reasoning, "just this");
        assert_eq!(answer, "just this");
    }

    #[tokio::test]
    async fn reason_uses_reasoning_options() {
        let chat = MockChat::replying("Think.\nAnswer: Paris");
        let outcome = reasoner(&chat).reason("Capital of France?").await;

        assert_eq!(outcome.answer, "Paris");
        assert_eq!(outcome.reasoning, "Think.");
        assert_eq!(outcome.full_response, "Think.\nAnswer: Paris");

        let options = chat.options().await;
        assert_eq!(options[0].temperature, 0.3);
        assert_eq!(options[0].max_tokens, 512);
        assert!(chat.prompts().await[0].contains("Question: Capital of France?"));
    }

    #[tokio::test]
    async fn reason_degrades_on_failure() {
        let chat = MockChat::failing();
        let outcome = reasoner(&chat).reason("q").await;
        assert_eq!(outcome.reasoning, "");
        assert_eq!(outcome.answer, REASONING_FAILED);
        assert!(outcome.full_response.contains("backend unavailable"));
    }

    #[tokio::test]
    async fn synthesis_trims_and_cites() {
        let chat = MockChat::replying("  Rust 1.85 shipped [Source 1].\n");
        let text = reasoner(&chat)
            .synthesize_with_context("When?", "Source 1: Blog\nRust 1.85\nURL: u")
            .await;
        assert_eq!(text, "Rust 1.85 shipped [Source 1].");

        let prompt = &chat.prompts().await[0];
        assert!(prompt.contains("Context:\nSource 1: Blog"));
        assert!(prompt.contains("[Source X]"));
        let options = chat.options().await;
        assert_eq!(options[0].temperature, 0.2);
        assert_eq!(options[0].max_tokens, 300);
    }

    #[tokio::test]
    async fn synthesis_failure_is_reported_in_text() {
        let text = reasoner(&MockChat::failing())
            .synthesize_with_context("q", "c")
            .await;
        assert!(text.starts_with("Error synthesizing response: "));
    }
}
