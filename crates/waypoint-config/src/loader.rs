// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/waypoint/waypoint.toml`, then
//! `~/.config/waypoint/waypoint.toml`, then `./waypoint.toml`, then
//! `WAYPOINT_*` environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WaypointConfig;

/// Config sections that may be targeted from the environment.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "ollama",
    "tavily",
    "retrieval",
    "routing",
    "reasoner",
    "generation",
    "fallback",
];

/// TOML files consulted by [`load_config`], lowest precedence first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/waypoint/waypoint.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("waypoint/waypoint.toml"));
    }
    paths.push(PathBuf::from("waypoint.toml"));
    paths
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(WaypointConfig::default()));
    for path in search_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<WaypointConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<WaypointConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WaypointConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WaypointConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WaypointConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `WAYPOINT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys contain underscores,
/// so `WAYPOINT_TAVILY_API_KEY` must become `tavily.api_key`.
fn env_provider() -> Env {
    Env::prefixed("WAYPOINT_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
