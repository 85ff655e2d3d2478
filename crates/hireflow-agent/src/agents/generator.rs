// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `generator` agent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hireflow_backend::BackendRegistry;
use hireflow_core::{Agent, GenerateOptions, HireflowError};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_request;

pub const GENERATOR_ID: &str = "generator";

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    prompt: String,
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

/// Actions:
/// - `generate` `{prompt, backend?, system_prompt?, temperature?, max_tokens?}` → `{text}`
/// - `backends` → `{available, active}`
pub struct GeneratorAgent {
    backends: Arc<BackendRegistry>,
    timeout: Duration,
}

impl GeneratorAgent {
    pub fn new(backends: Arc<BackendRegistry>, timeout: Duration) -> Self {
        Self { backends, timeout }
    }
}

#[async_trait]
impl Agent for GeneratorAgent {
    fn id(&self) -> &str {
        GENERATOR_ID
    }

    async fn handle(&self, action: &str, data: Value) -> Result<Value, HireflowError> {
        match action {
            "generate" => {
                let request: GenerateRequest = parse_request(action, data)?;
                let options = GenerateOptions {
                    temperature: request.temperature,
                    max_tokens: request.max_tokens,
                    system_prompt: request.system_prompt,
                    timeout: Some(self.timeout),
                };
                let text = self
                    .backends
                    .generate(&request.prompt, &options, request.backend.as_deref())
                    .await?;
                Ok(json!({ "text": text }))
            }
            "backends" => Ok(json!({
                "available": self.backends.list_available(),
                "active": self.backends.active_name(),
            })),
            _ => Err(HireflowError::UnknownAction {
                agent: GENERATOR_ID.to_string(),
                action: action.to_string(),
            }),
        }
    }
}
