// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hireflow agent runtime.
//!
//! Fixed sections use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! keys at startup. Per-entry fields that a named backend or credential needs
//! are optional here: an entry missing one of them is dropped by the owning
//! registry instead of failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Hireflow configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HireflowConfig {
    /// Runtime-wide settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Generation backends, one per `[[backends]]` table.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,

    /// Per-service credential records, one per `[[credentials]]` table.
    #[serde(default)]
    pub credentials: Vec<CredentialConfig>,

    /// Calendar integrations keyed by provider name (`[calendars.dingtalk]`).
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarIntegrationConfig>,

    /// Plugin discovery settings.
    #[serde(default)]
    pub plugins: PluginConfig,
}

/// Runtime-wide behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Backend to activate at startup.
    #[serde(default = "default_backend")]
    pub default_backend: String,

    /// Upper bound for a single generation request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound for a single calendar sync target, in seconds.
    #[serde(default = "default_sync_timeout_secs")]
    pub sync_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_backend: default_backend(),
            request_timeout_secs: default_request_timeout_secs(),
            sync_timeout_secs: default_sync_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "qwen".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_sync_timeout_secs() -> u64 {
    30
}

/// One OpenAI-compatible generation backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Registry name (e.g. "qwen").
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model identifier sent with each request.
    #[serde(default)]
    pub model_id: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Credential-manager service holding the API key.
    #[serde(default)]
    pub credential: Option<String>,

    /// Environment variable holding the API key, consulted after `credential`.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl BackendConfig {
    /// Environment variable consulted for this backend's key.
    ///
    /// Defaults to `<NAME>_API_KEY`, so a backend named `qwen` reads `QWEN_API_KEY`.
    pub fn api_key_env_var(&self) -> String {
        self.api_key_env.clone().unwrap_or_else(|| {
            format!("{}_API_KEY", self.name.to_ascii_uppercase().replace('-', "_"))
        })
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

/// One per-service credential record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// Service name the credential belongs to.
    pub service: String,

    /// Inline secret value. Prefer `value_env` outside of development.
    #[serde(default)]
    pub value: Option<String>,

    /// Environment variable supplying the secret when `value` is absent.
    #[serde(default)]
    pub value_env: Option<String>,

    /// RFC 3339 expiry timestamp. Absent means the credential never expires.
    #[serde(default)]
    pub expiry: Option<String>,

    /// Capability tags granted to this credential.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A single calendar integration.
///
/// Provider-specific keys (`app_key`, `client_id`, ...) are collected into
/// `settings`; required keys are checked per provider at sync time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalendarIntegrationConfig {
    /// Whether this integration participates in fan-out.
    #[serde(default)]
    pub enabled: bool,

    /// Provider-specific settings.
    #[serde(flatten)]
    pub settings: BTreeMap<String, String>,
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Directory scanned for `*/plugin.toml` manifests. `None` disables scanning.
    #[serde(default)]
    pub dir: Option<String>,

    /// Catalog plugins that should not be loaded.
    #[serde(default)]
    pub disabled: Vec<String>,
}
