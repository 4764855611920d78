// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Waypoint - adaptive query router.
//!
//! This is the binary entry point and composition root.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use waypoint_core::Intent;

/// Waypoint - route each query to retrieval, reasoning or a domain adapter.
#[derive(Parser, Debug)]
#[command(name = "waypoint", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a query and print the response envelope as JSON.
    Route {
        query: String,

        /// Ground-truth intent, recorded in classification metrics.
        #[arg(long)]
        expect: Option<Intent>,

        /// Print Prometheus metrics to stderr after routing.
        #[arg(long)]
        metrics: bool,
    },
    /// Classify a query and print only the analysis.
    Analyze { query: String },
    /// Validate and print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => waypoint_config::load_and_validate_path(path),
        None => waypoint_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            waypoint_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    commands::init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Route {
            query,
            expect,
            metrics,
        } => commands::run_route(&config, &query, expect, metrics).await,
        Commands::Analyze { query } => commands::run_analyze(&config, &query).await,
        Commands::Config => commands::run_config(&config),
    };

    if let Err(e) = result {
        eprintln!("waypoint: {e}");
        std::process::exit(1);
    }
}
