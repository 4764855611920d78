// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama backends for the Waypoint query router.
//!
//! One [`OllamaClient`] talks to the server; [`OllamaChat`],
//! [`OllamaGenerator`] and [`OllamaEmbedder`] adapt it to the core
//! collaborator traits, and [`OllamaAdapterLoader`] binds domain adapters.

pub mod backends;
pub mod client;
pub mod loader;
pub mod types;

pub use backends::{OllamaChat, OllamaEmbedder, OllamaGenerator};
pub use client::OllamaClient;
pub use loader::OllamaAdapterLoader;
