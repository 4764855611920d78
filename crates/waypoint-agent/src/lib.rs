// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strategy execution for the Waypoint query router.
//!
//! [`Orchestrator`] ties the analyzer, semantic domain router, retrieval
//! client, [`Reasoner`] and [`AdapterRegistry`] together and returns one
//! [`RoutedResponse`] per query.

pub mod adapters;
pub mod collector;
pub mod fallback;
pub mod orchestrator;
pub mod reasoner;

pub use adapters::AdapterRegistry;
pub use collector::TracingSink;
pub use fallback::UncertaintyRules;
pub use orchestrator::{Backends, Mode, Orchestrator, RoutedResponse};
pub use reasoner::{Reasoner, ReasoningOutcome, REASONING_FAILED};
