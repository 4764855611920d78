// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Every external service the routing core talks to extends the
//! [`PluginAdapter`] base trait and uses `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod adapter;
pub mod chat;
pub mod embedding;
pub mod generation;
pub mod moderation;
pub mod search;
pub mod sink;

pub use adapter::PluginAdapter;
pub use chat::ChatBackend;
pub use embedding::EmbeddingAdapter;
pub use generation::{AdapterLoader, GenerationBackend};
pub use moderation::ContentModerator;
pub use search::SearchProvider;
pub use sink::InteractionSink;
