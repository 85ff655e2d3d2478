// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across capability traits and the runtime registries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies which registry a named component lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ComponentKind {
    Backend,
    Plugin,
    Agent,
    Credential,
}

/// Health status reported by the runtime for each component family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational with reduced capability.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

/// Per-call generation overrides.
///
/// Unset fields fall back to the backend descriptor's configured values.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    /// Upper bound on the network-bound generation step.
    pub timeout: Option<Duration>,
}

impl GenerateOptions {
    /// Options with only a timeout set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// Descriptive metadata for a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub model_id: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_tokens: u32,
}
