// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `plugin_gateway` agent: plugin invocation through the router.

use std::sync::Arc;

use async_trait::async_trait;
use hireflow_core::{Agent, HireflowError};
use hireflow_plugin::PluginRegistry;
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_request;

pub const PLUGIN_GATEWAY_ID: &str = "plugin_gateway";

#[derive(Debug, Deserialize)]
struct InvokeRequest {
    plugin: String,
    method: String,
    #[serde(default)]
    args: Value,
}

/// Actions:
/// - `invoke` `{plugin, method, args?}` → the plugin's result
/// - `list` → summaries of loaded plugins
pub struct PluginGatewayAgent {
    plugins: Arc<PluginRegistry>,
}

impl PluginGatewayAgent {
    pub fn new(plugins: Arc<PluginRegistry>) -> Self {
        Self { plugins }
    }
}

#[async_trait]
impl Agent for PluginGatewayAgent {
    fn id(&self) -> &str {
        PLUGIN_GATEWAY_ID
    }

    async fn handle(&self, action: &str, data: Value) -> Result<Value, HireflowError> {
        match action {
            "invoke" => {
                let request: InvokeRequest = parse_request(action, data)?;
                self.plugins
                    .invoke(&request.plugin, &request.method, request.args)
                    .await
            }
            "list" => Ok(json!(self.plugins.describe())),
            _ => Err(HireflowError::UnknownAction {
                agent: PLUGIN_GATEWAY_ID.to_string(),
                action: action.to_string(),
            }),
        }
    }
}
