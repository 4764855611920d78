// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uncertainty detection for base-model answers.
//!
//! A best-effort lexical signal: a marker found in the answer suggests the
//! model did not know, and the orchestrator retries through retrieval. It
//! will miss confident hallucinations and may flag polite answers.

use waypoint_config::model::FallbackConfig;

/// Versioned, case-insensitive marker table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncertaintyRules {
    version: u32,
    markers: Vec<String>,
}

impl UncertaintyRules {
    /// The original table: "i don't know" and "sorry".
    pub fn v1() -> Self {
        Self {
            version: 1,
            markers: vec!["i don't know".to_string(), "sorry".to_string()],
        }
    }

    /// Rules from configuration. A table equal to v1 keeps version 1;
    /// any customized table is reported as version 0.
    pub fn from_config(config: &FallbackConfig) -> Self {
        let markers: Vec<String> = config
            .markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        let v1 = Self::v1();
        let version = if markers == v1.markers { 1 } else { 0 };
        Self { version, markers }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// First marker contained in `response`, if any.
    pub fn matches(&self, response: &str) -> Option<&str> {
        let lower = response.to_lowercase();
        self.markers
            .iter()
            .find(|m| lower.contains(m.as_str()))
            .map(String::as_str)
    }
}

impl Default for UncertaintyRules {
    fn default() -> Self {
        Self::v1()
    }
}
