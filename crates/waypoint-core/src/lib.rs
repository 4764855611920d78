// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Waypoint adaptive query router.
//!
//! This crate provides the error taxonomy, the types shared between the
//! routing stages, and the collaborator traits that external services
//! (chat backends, embedding models, search providers, generation
//! backends) implement.

pub mod error;
pub mod timeout;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, WaypointError};
pub use timeout::with_timeout;
pub use types::{
    AdapterType, ChatOptions, Domain, GenerationParams, HealthStatus, Intent, Interaction,
    SearchDepth, SearchResult,
};

pub use traits::{
    AdapterLoader, ChatBackend, ContentModerator, EmbeddingAdapter, GenerationBackend,
    InteractionSink, PluginAdapter, SearchProvider,
};
