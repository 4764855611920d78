// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos fail loudly at
//! startup instead of silently falling back to defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waypoint_core::SearchDepth;

/// Top-level Waypoint configuration. Every section is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WaypointConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Ollama-compatible backend for chat, generation and embeddings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Tavily web search provider.
    #[serde(default)]
    pub tavily: TavilyConfig,

    /// Retrieval cache, rate limit and retry policy.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Intent classification and domain routing.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Chain-of-thought and synthesis sampling.
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    /// Sampling parameters for base model and adapter generation.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Domain adapters, one entry per fine-tuned domain.
    #[serde(default = "default_adapters")]
    pub adapters: Vec<AdapterSpecConfig>,

    /// Low-confidence escalation to retrieval.
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            ollama: OllamaConfig::default(),
            tavily: TavilyConfig::default(),
            retrieval: RetrievalConfig::default(),
            routing: RoutingConfig::default(),
            reasoner: ReasonerConfig::default(),
            generation: GenerationConfig::default(),
            adapters: default_adapters(),
            fallback: FallbackConfig::default(),
        }
    }
}

/// Process identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "waypoint".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ollama backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model used by the adjudicator and the reasoner.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Base model for plain generation when no adapter applies.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Sentence embedding model for the semantic router.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            chat_model: default_chat_model(),
            generation_model: default_generation_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_ollama_timeout(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_chat_model() -> String {
    "llama3.1:8b-instruct-q4_K_M".to_string()
}

fn default_generation_model() -> String {
    "qwen2.5:0.5b-instruct".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_ollama_timeout() -> u64 {
    120
}

/// Tavily search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TavilyConfig {
    /// API key. `None` disables retrieval; RAG routes then fail with a
    /// configuration error.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_tavily_url")]
    pub base_url: String,

    #[serde(default)]
    pub search_depth: SearchDepth,

    #[serde(default = "default_tavily_timeout")]
    pub timeout_secs: u64,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tavily_url(),
            search_depth: SearchDepth::default(),
            timeout_secs: default_tavily_timeout(),
        }
    }
}

fn default_tavily_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_tavily_timeout() -> u64 {
    30
}

/// Which key the retrieval cache drops when it is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionKind {
    /// Oldest inserted key, regardless of access recency.
    #[default]
    Fifo,
    /// Least recently inserted or read key.
    Lru,
}

/// Retrieval cache, rate limit and retry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default)]
    pub eviction: EvictionKind,

    /// Provider calls allowed per window.
    #[serde(default = "default_max_requests")]
    pub max_requests_per_window: usize,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Results requested per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Provider attempts per cache miss, 1 to 10.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            eviction: EvictionKind::default(),
            max_requests_per_window: default_max_requests(),
            window_secs: default_window_secs(),
            max_results: default_max_results(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_cache_capacity() -> usize {
    128
}

fn default_max_requests() -> usize {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_results() -> usize {
    3
}

fn default_max_retries() -> u32 {
    3
}

/// Intent classification and domain routing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Rule-engine verdicts below this confidence go to the adjudicator.
    #[serde(default = "default_adjudication_threshold")]
    pub adjudication_threshold: f32,

    /// Domains the adjudicator may answer with, in match priority order.
    #[serde(default = "default_known_domains")]
    pub known_domains: Vec<String>,

    #[serde(default = "default_adjudicator_temperature")]
    pub adjudicator_temperature: f32,

    #[serde(default = "default_adjudicator_max_tokens")]
    pub adjudicator_max_tokens: u32,

    /// Representative queries per domain for the semantic router.
    #[serde(default = "default_exemplars")]
    pub exemplars: BTreeMap<String, Vec<String>>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            adjudication_threshold: default_adjudication_threshold(),
            known_domains: default_known_domains(),
            adjudicator_temperature: default_adjudicator_temperature(),
            adjudicator_max_tokens: default_adjudicator_max_tokens(),
            exemplars: default_exemplars(),
        }
    }
}

fn default_adjudication_threshold() -> f32 {
    0.6
}

fn default_known_domains() -> Vec<String> {
    ["code", "medical", "legal", "general"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_adjudicator_temperature() -> f32 {
    0.1
}

fn default_adjudicator_max_tokens() -> u32 {
    10
}

fn default_exemplars() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, [&str; 5]); 4] = [
        (
            "code",
            [
                "Write a Python function to sort a list",
                "How do I reverse a string in JavaScript",
                "Create a REST API endpoint",
                "Debug this SQL query",
                "Implement binary search algorithm",
            ],
        ),
        (
            "medical",
            [
                "What are the symptoms of diabetes",
                "Explain the cardiovascular system",
                "Treatment for hypertension",
                "Side effects of antibiotics",
                "Diagnosis of common cold",
            ],
        ),
        (
            "legal",
            [
                "What is contract law",
                "Explain intellectual property rights",
                "Terms of service requirements",
                "Privacy policy compliance",
                "Employment law regulations",
            ],
        ),
        (
            "general",
            [
                "What is the weather like",
                "Tell me about history",
                "Explain quantum physics",
                "How does photosynthesis work",
                "What is artificial intelligence",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(domain, queries)| {
            (
                domain.to_string(),
                queries.into_iter().map(String::from).collect(),
            )
        })
        .collect()
}

/// Reasoner sampling settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReasonerConfig {
    #[serde(default = "default_reasoning_temperature")]
    pub reasoning_temperature: f32,

    #[serde(default = "default_reasoning_max_tokens")]
    pub reasoning_max_tokens: u32,

    #[serde(default = "default_synthesis_temperature")]
    pub synthesis_temperature: f32,

    #[serde(default = "default_synthesis_max_tokens")]
    pub synthesis_max_tokens: u32,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            reasoning_temperature: default_reasoning_temperature(),
            reasoning_max_tokens: default_reasoning_max_tokens(),
            synthesis_temperature: default_synthesis_temperature(),
            synthesis_max_tokens: default_synthesis_max_tokens(),
        }
    }
}

fn default_reasoning_temperature() -> f32 {
    0.3
}

fn default_reasoning_max_tokens() -> u32 {
    512
}

fn default_synthesis_temperature() -> f32 {
    0.2
}

fn default_synthesis_max_tokens() -> u32 {
    300
}

/// Generation sampling parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            temperature: default_generation_temperature(),
            top_p: default_top_p(),
            repetition_penalty: default_repetition_penalty(),
        }
    }
}

impl GenerationConfig {
    pub fn params(&self) -> waypoint_core::GenerationParams {
        waypoint_core::GenerationParams {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            repetition_penalty: self.repetition_penalty,
        }
    }
}

fn default_max_new_tokens() -> u32 {
    256
}

fn default_generation_temperature() -> f32 {
    0.5
}

fn default_top_p() -> f32 {
    0.85
}

fn default_repetition_penalty() -> f32 {
    1.1
}

/// A fine-tuned adapter for one domain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterSpecConfig {
    pub domain: String,

    /// Adapter directory. Relative paths resolve against the working directory.
    pub path: String,

    /// Backend model tag serving this adapter.
    pub model: String,
}

fn default_adapters() -> Vec<AdapterSpecConfig> {
    vec![AdapterSpecConfig {
        domain: "code".to_string(),
        path: "adapters/code".to_string(),
        model: "qwen2.5-code-lora".to_string(),
    }]
}

/// Low-confidence escalation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    /// Re-route uncertain base-model answers through retrieval.
    #[serde(default = "default_fallback_enabled")]
    pub enabled: bool,

    /// Case-insensitive substrings that mark a response as uncertain.
    #[serde(default = "default_fallback_markers")]
    pub markers: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: default_fallback_enabled(),
            markers: default_fallback_markers(),
        }
    }
}

fn default_fallback_enabled() -> bool {
    true
}

fn default_fallback_markers() -> Vec<String> {
    vec!["i don't know".to_string(), "sorry".to_string()]
}
