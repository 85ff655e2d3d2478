// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in agents registered on every runtime.

pub mod gateway;
pub mod generator;
pub mod scheduler;

pub use gateway::PluginGatewayAgent;
pub use generator::GeneratorAgent;
pub use scheduler::InterviewSchedulerAgent;

use hireflow_core::HireflowError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize an action payload, naming the action on failure.
pub(crate) fn parse_request<T: DeserializeOwned>(action: &str, data: Value) -> Result<T, HireflowError> {
    serde_json::from_value(data)
        .map_err(|e| HireflowError::InvalidRequest(format!("{action}: {e}")))
}
