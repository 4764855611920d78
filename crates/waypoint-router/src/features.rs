// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical feature extraction.
//!
//! Queries are lowercased and split into `\w+` tokens. A single-word marker
//! matches a whole token; a marker with several words (or hyphenated parts)
//! matches a contiguous run of tokens. This keeps `api` from firing inside
//! `capital` while still catching `step-by-step` and `chain of thought`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

pub const TASK_VERBS: &[&str] = &[
    "analyze", "compare", "contrast", "evaluate", "synthesize", "explain", "describe",
    "generate", "optimize", "refactor", "debug", "summarize", "list", "identify",
];

/// Domain name followed by the markers that signal it.
pub const DOMAIN_MARKERS: &[(&str, &[&str])] = &[
    (
        "code",
        &[
            "code", "def", "class", "import", "function", "api", "bug", "error", "exception",
            "compiler", "runtime", "python", "javascript",
        ],
    ),
    (
        "math",
        &[
            "equation", "calc", "theorem", "proof", "integral", "derivative", "matrix",
            "algebra",
        ],
    ),
    (
        "medical",
        &[
            "symptom", "disease", "treatment", "diagnosis", "patient", "clinical", "drug",
            "therapy",
        ],
    ),
    (
        "legal",
        &[
            "law", "regulation", "contract", "statute", "compliance", "copyright", "liability",
            "court",
        ],
    ),
];

pub const REASONING_INDICATORS: &[&str] = &[
    "because", "therefore", "consequently", "due to", "implies", "leads to", "cause",
    "effect", "justify", "verify", "step-by-step", "chain of thought", "reasoning",
];

pub const REALTIME_INDICATORS: &[&str] = &[
    "news", "latest", "current", "today", "yesterday", "recent", "weather", "stock", "price",
    "event", "schedule", "release date", "traffic", "2024", "2025",
];

/// Lexical signals derived once per query.
///
/// Built by [`QueryFeatures::extract`] and never mutated afterwards. All
/// marker sets hold entries of the fixed tables in this module, so they
/// serialize in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryFeatures {
    /// Number of `\w+` tokens in the lowercased query.
    pub token_count: usize,
    /// Entries of [`TASK_VERBS`] found in the query.
    pub task_verbs: BTreeSet<&'static str>,
    /// Names of the domains whose markers appear.
    pub domain_markers: BTreeSet<&'static str>,
    /// Entries of [`REASONING_INDICATORS`] found in the query.
    pub reasoning: BTreeSet<&'static str>,
    /// Entries of [`REALTIME_INDICATORS`] found in the query.
    pub realtime: BTreeSet<&'static str>,
    /// The query contains a comma, a semicolon or the word "and".
    pub is_complex_structure: bool,
    /// The query contains a fenced block or a brace.
    pub has_code_block: bool,
}

impl QueryFeatures {
    /// Extract features from a raw query.
    pub fn extract(query: &str) -> Self {
        let lower = query.to_lowercase();
        let tokens: Vec<&str> = TOKEN.find_iter(&lower).map(|m| m.as_str()).collect();

        let domain_markers = DOMAIN_MARKERS
            .iter()
            .filter(|(_, markers)| markers.iter().any(|m| contains_marker(&tokens, m)))
            .map(|(domain, _)| *domain)
            .collect();

        Self {
            token_count: tokens.len(),
            task_verbs: matching(&tokens, TASK_VERBS),
            domain_markers,
            reasoning: matching(&tokens, REASONING_INDICATORS),
            realtime: matching(&tokens, REALTIME_INDICATORS),
            is_complex_structure: lower.contains(',')
                || lower.contains(';')
                || lower.contains(" and "),
            has_code_block: lower.contains("```") || lower.contains('{'),
        }
    }

    /// Whether any marker of `domain` (e.g. `"code"`) was matched.
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domain_markers.contains(domain)
    }
}

fn matching(tokens: &[&str], markers: &[&'static str]) -> BTreeSet<&'static str> {
    markers
        .iter()
        .copied()
        .filter(|m| contains_marker(tokens, m))
        .collect()
}

fn contains_marker(tokens: &[&str], marker: &str) -> bool {
    let parts: Vec<&str> = TOKEN.find_iter(marker).map(|m| m.as_str()).collect();
    match parts.as_slice() {
        [] => false,
        [single] => tokens.contains(single),
        _ => tokens.windows(parts.len()).any(|w| w == parts.as_slice()),
    }
}
