// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hireflow.toml` > `~/.config/hireflow/hireflow.toml` >
//! `/etc/hireflow/hireflow.toml` with environment variable overrides via the
//! `HIREFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HireflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hireflow/hireflow.toml`
/// 3. `~/.config/hireflow/hireflow.toml`
/// 4. `./hireflow.toml`
/// 5. `HIREFLOW_*` environment variables
pub fn load_config() -> Result<HireflowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HireflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HireflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HireflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HireflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HireflowConfig::default()))
        .merge(Toml::file("/etc/hireflow/hireflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hireflow/hireflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hireflow.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `HIREFLOW_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that underscore-containing
/// keys survive: `HIREFLOW_RUNTIME_LOG_LEVEL` must become `runtime.log_level`.
/// Only scalar sections are mapped; array sections come from TOML files.
fn env_provider() -> Env {
    Env::prefixed("HIREFLOW_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            key.starts_with("runtime_") || key.starts_with("plugins_")
        })
        .map(|key| {
            let mapped = key
                .as_str()
                .to_ascii_lowercase()
                .replacen("runtime_", "runtime.", 1)
                .replacen("plugins_", "plugins.", 1);
            mapped.into()
        })
}
