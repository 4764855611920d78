// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic intent rules.
//!
//! Rules run in a fixed order and the first one that fires wins. No I/O, no
//! randomness: the same features always produce the same verdict.

use waypoint_core::Intent;

use crate::features::QueryFeatures;

/// Verbs that turn a code query into an explanation task.
const EXPLANATORY_VERBS: &[&str] = &["explain", "analyze", "describe"];

/// Complexity score at which a query needs multi-step reasoning.
const COMPLEXITY_CUTOFF: usize = 3;

/// Queries shorter than this with zero complexity are answered directly.
const SHORT_QUERY_TOKENS: usize = 15;

/// Rule engine output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Decided { intent: Intent, confidence: f32 },
    /// No rule fired. Carries an implicit confidence of zero.
    Ambiguous,
}

impl Verdict {
    fn decided(intent: Intent, confidence: f32) -> Self {
        Verdict::Decided { intent, confidence }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Verdict::Decided { confidence, .. } => *confidence,
            Verdict::Ambiguous => 0.0,
        }
    }
}

/// `2 * verbs + 3 * reasoning indicators + 1 if the query is compound`.
pub fn complexity_score(features: &QueryFeatures) -> usize {
    2 * features.task_verbs.len()
        + 3 * features.reasoning.len()
        + usize::from(features.is_complex_structure)
}

/// Apply the rules in order.
pub fn evaluate(features: &QueryFeatures) -> Verdict {
    if !features.realtime.is_empty() {
        return Verdict::decided(Intent::ExternalSearch, 0.9);
    }

    if features.has_domain("code") || features.has_code_block {
        let explanatory = EXPLANATORY_VERBS
            .iter()
            .any(|verb| features.task_verbs.contains(verb));
        return if explanatory {
            Verdict::decided(Intent::ComplexReasoning, 0.85)
        } else {
            Verdict::decided(Intent::SimpleInternal, 0.9)
        };
    }

    let complexity = complexity_score(features);
    if complexity >= COMPLEXITY_CUTOFF {
        return Verdict::decided(Intent::ComplexReasoning, 0.8);
    }

    if features.token_count < SHORT_QUERY_TOKENS && complexity == 0 {
        return Verdict::decided(Intent::SimpleInternal, 0.8);
    }

    Verdict::Ambiguous
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(query: &str) -> Verdict {
        evaluate(&QueryFeatures::extract(query))
    }

    #[test]
    fn realtime_beats_everything() {
        assert_eq!(
            verdict("latest python compiler news, explain because"),
            Verdict::decided(Intent::ExternalSearch, 0.9)
        );
    }

    #[test]
    fn plain_code_request_is_simple() {
        assert_eq!(
            verdict("Write a python function to sort a list"),
            Verdict::decided(Intent::SimpleInternal, 0.9)
        );
    }

    #[test]
    fn explaining_code_needs_reasoning() {
        assert_eq!(
            verdict("Explain this code and analyze its complexity"),
            Verdict::decided(Intent::ComplexReasoning, 0.85)
        );
    }

    #[test]
    fn code_block_counts_as_code() {
        assert_eq!(
            verdict("describe what { x } does"),
            Verdict::decided(Intent::ComplexReasoning, 0.85)
        );
    }

    #[test]
    fn high_complexity_needs_reasoning() {
        assert_eq!(
            verdict(
                "Analyze the impact of interest rates and explain step-by-step, because it matters"
            ),
            Verdict::decided(Intent::ComplexReasoning, 0.8)
        );
    }

    #[test]
    fn short_plain_query_is_simple() {
        assert_eq!(
            verdict("Who painted the Mona Lisa?"),
            Verdict::decided(Intent::SimpleInternal, 0.8)
        );
    }

    #[test]
    fn one_verb_alone_is_ambiguous() {
        // complexity 2: below the reasoning cutoff, above zero.
        assert_eq!(verdict("Summarize the French revolution"), Verdict::Ambiguous);
    }

    #[test]
    fn long_plain_query_is_ambiguous() {
        let query = "I was wondering whether you happen to know who it was that \
                     first climbed the tallest mountain on the planet";
        assert!(QueryFeatures::extract(query).token_count >= 15);
        assert_eq!(verdict(query), Verdict::Ambiguous);
    }

    #[test]
    fn complexity_counts_each_signal() {
        let f = QueryFeatures::extract("compare and contrast, therefore");
        // 2 verbs, 1 reasoning indicator, compound.
        assert_eq!(complexity_score(&f), 2 * 2 + 3 + 1);
    }
}
