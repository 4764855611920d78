// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification for the Waypoint router.
//!
//! This crate provides:
//! - [`QueryFeatures`]: lexical signals extracted from a query
//! - [`rules::evaluate`]: the deterministic intent rules
//! - [`Adjudicator`]: LLM fallback when the rules are unsure
//! - [`QueryAnalyzer`]: the hybrid pipeline combining both
//! - [`SemanticRouter`]: embedding-based domain selection

pub mod adjudicator;
pub mod analyzer;
pub mod features;
pub mod rules;
pub mod semantic;

pub use adjudicator::Adjudicator;
pub use analyzer::{intent_for_domain, AnalysisResult, AnalysisSource, QueryAnalyzer};
pub use features::QueryFeatures;
pub use rules::Verdict;
pub use semantic::{cosine_similarity, SemanticRouter};
