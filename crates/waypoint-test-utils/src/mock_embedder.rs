// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bag-of-words embedder.
//!
//! Each vocabulary word is one dimension; a text's vector counts how often
//! each word occurs as a `\w+` token. Texts sharing words score high under
//! cosine similarity, which is enough to exercise domain routing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use waypoint_core::{AdapterType, EmbeddingAdapter, PluginAdapter, WaypointError};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

#[derive(Clone)]
pub struct MockEmbedder {
    vocabulary: Arc<Vec<String>>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MockEmbedder {
    pub fn with_vocabulary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: Arc::new(words.into_iter().map(|w| w.into().to_lowercase()).collect()),
            calls: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
            delay: None,
        }
    }

    /// Sleep this long inside every `embed` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// An embedder whose every call fails.
    pub fn failing() -> Self {
        let embedder = Self::with_vocabulary(Vec::<String>::new());
        embedder.set_failing(true);
        embedder
    }

    /// Toggle failure at runtime, e.g. to make only construction succeed.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Vector for a single text.
    pub fn vector(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0; self.vocabulary.len()];
        for token in TOKEN.find_iter(&lower) {
            if let Some(i) = self.vocabulary.iter().position(|w| w == token.as_str()) {
                vector[i] += 1.0;
            }
        }
        vector
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, WaypointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(WaypointError::external_msg("mock-embedder", "model not loaded"));
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}
