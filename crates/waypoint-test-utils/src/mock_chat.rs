// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted chat and generation backends.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use waypoint_core::{
    AdapterType, ChatBackend, ChatOptions, GenerationBackend, GenerationParams, PluginAdapter,
    WaypointError,
};

const DEFAULT_REPLY: &str = "mock response";

/// Queue of replies shared by both mocks.
///
/// Scripted replies are popped in order; once drained, the fallback reply is
/// returned (or an error when the script is failing).
#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl Script {
    fn new(fallback: Option<String>) -> Self {
        Self {
            fallback,
            ..Default::default()
        }
    }

    async fn next(&self, service: &'static str, prompt: &str) -> Result<String, WaypointError> {
        self.prompts.lock().await.push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.replies.lock().await.pop_front();
        match scripted {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(WaypointError::external_msg(service, message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| WaypointError::external_msg(service, "backend unavailable")),
        }
    }
}

/// Mock [`ChatBackend`].
#[derive(Clone)]
pub struct MockChat {
    script: Arc<Script>,
    options: Arc<Mutex<Vec<ChatOptions>>>,
}

impl MockChat {
    /// Always replies `"mock response"` once scripted replies run out.
    pub fn new() -> Self {
        Self::replying(DEFAULT_REPLY)
    }

    /// Always replies with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::from_script(Script::new(Some(text.into())))
    }

    /// Replies with each entry in order, then `"mock response"`.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(Script {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Script::new(Some(DEFAULT_REPLY.to_string()))
        })
    }

    /// Every call fails with an external-service error.
    pub fn failing() -> Self {
        Self::from_script(Script::new(None))
    }

    /// Replies with `text` after sleeping for `delay`.
    pub fn delayed(text: impl Into<String>, delay: Duration) -> Self {
        let mut script = Script::new(Some(text.into()));
        script.delay = Some(delay);
        Self::from_script(script)
    }

    fn from_script(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            options: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received so far, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.script.prompts.lock().await.clone()
    }

    /// Sampling options received so far.
    pub async fn options(&self) -> Vec<ChatOptions> {
        self.options.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.script.prompts.lock().await.len()
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChat {
    fn name(&self) -> &str {
        "mock-chat"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    async fn chat(&self, prompt: &str, options: ChatOptions) -> Result<String, WaypointError> {
        self.options.lock().await.push(options);
        self.script.next("mock-chat", prompt).await
    }
}

/// Mock [`GenerationBackend`].
#[derive(Clone)]
pub struct MockGenerator {
    name: String,
    script: Arc<Script>,
    params: Arc<Mutex<Vec<GenerationParams>>>,
}

impl MockGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::named("mock-generator", text)
    }

    /// A generator with a custom adapter name, replying `text`.
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Script::new(Some(text.into()))),
            params: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            name: "mock-generator".to_string(),
            script: Arc::new(Script::new(None)),
            params: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.script.prompts.lock().await.clone()
    }

    pub async fn params(&self) -> Vec<GenerationParams> {
        self.params.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }
}

#[async_trait]
impl GenerationBackend for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, WaypointError> {
        self.params.lock().await.push(*params);
        self.script.next("mock-generator", prompt).await
    }
}
