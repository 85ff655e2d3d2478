// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction and ownership of every runtime component.

use std::sync::Arc;
use std::time::Duration;

use hireflow_backend::BackendRegistry;
use hireflow_bus::AgentRouter;
use hireflow_calendar::CalendarFanOut;
use hireflow_config::model::HireflowConfig;
use hireflow_core::{HealthStatus, HireflowError};
use hireflow_plugin::PluginRegistry;
use hireflow_vault::CredentialManager;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::agents::{GeneratorAgent, InterviewSchedulerAgent, PluginGatewayAgent};

/// Snapshot of what the runtime can currently do.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStatus {
    pub health: HealthStatus,
    pub active_backend: Option<String>,
    pub backends: Vec<String>,
    pub plugins: Vec<String>,
    pub credentials: Vec<String>,
    pub calendars: Vec<String>,
    pub agents: Vec<String>,
}

/// Owns the registries and routes requests to built-in agents.
///
/// Nothing here is global; each component is shared through `Arc` and
/// can be inspected directly by callers that need more than [`send`](Self::send).
pub struct Runtime {
    config: HireflowConfig,
    credentials: Arc<CredentialManager>,
    backends: Arc<BackendRegistry>,
    plugins: Arc<PluginRegistry>,
    calendars: Arc<CalendarFanOut>,
    router: Arc<AgentRouter>,
}

impl Runtime {
    /// Build every component from configuration.
    ///
    /// Missing keys, unreachable plugins, and unusable credentials only
    /// reduce capability; construction itself cannot fail.
    pub async fn from_config(config: HireflowConfig) -> Self {
        let credentials = Arc::new(CredentialManager::from_config(&config.credentials));
        let backends = Arc::new(BackendRegistry::from_config(&config, &credentials));

        let plugins = Arc::new(PluginRegistry::from_config(&config.plugins));
        let outcomes = plugins.load_all().await;
        let failed = outcomes.values().filter(|o| !o.is_loaded()).count();
        info!(loaded = outcomes.len() - failed, failed, "plugins loaded");

        Self::new(config, credentials, backends, plugins)
    }

    /// Assemble a runtime from pre-built registries.
    ///
    /// Calendars come from `config.calendars`; built-in agents are registered
    /// on a fresh router.
    pub fn new(
        config: HireflowConfig,
        credentials: Arc<CredentialManager>,
        backends: Arc<BackendRegistry>,
        plugins: Arc<PluginRegistry>,
    ) -> Self {
        let sync_timeout = Duration::from_secs(config.runtime.sync_timeout_secs);
        let request_timeout = Duration::from_secs(config.runtime.request_timeout_secs);
        let calendars = Arc::new(CalendarFanOut::new(config.calendars.clone(), sync_timeout));

        let router = Arc::new(AgentRouter::new());
        router.register(Arc::new(GeneratorAgent::new(
            Arc::clone(&backends),
            request_timeout,
        )));
        router.register(Arc::new(InterviewSchedulerAgent::new(
            Arc::clone(&backends),
            Arc::clone(&calendars),
            request_timeout,
        )));
        router.register(Arc::new(PluginGatewayAgent::new(Arc::clone(&plugins))));

        let runtime = Self {
            config,
            credentials,
            backends,
            plugins,
            calendars,
            router,
        };
        if let HealthStatus::Degraded(reason) = &runtime.status().health {
            warn!(%reason, "runtime started with reduced capability");
        }
        runtime
    }

    /// Deliver an action to an agent.
    pub async fn send(&self, target: &str, action: &str, data: Value) -> Result<Value, HireflowError> {
        self.router.send(target, action, data).await
    }

    pub fn status(&self) -> RuntimeStatus {
        let active_backend = self.backends.active_name();
        let plugins = self.plugins.loaded_names();
        let credentials = self.credentials.services();

        let mut gaps = Vec::new();
        if active_backend.is_none() {
            gaps.push("no active backend");
        }
        if plugins.is_empty() {
            gaps.push("no plugins loaded");
        }
        if credentials.is_empty() {
            gaps.push("no credentials configured");
        }
        let health = if gaps.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded(gaps.join(", "))
        };

        RuntimeStatus {
            health,
            active_backend,
            backends: self.backends.list_available().into_iter().collect(),
            plugins,
            credentials,
            calendars: self
                .calendars
                .integration_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            agents: self.router.agent_ids(),
        }
    }

    /// Clean up loaded plugins.
    pub async fn shutdown(&self) {
        self.plugins.shutdown().await;
        info!("runtime shut down");
    }

    pub fn config(&self) -> &HireflowConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    pub fn backends(&self) -> &Arc<BackendRegistry> {
        &self.backends
    }

    pub fn plugins(&self) -> &Arc<PluginRegistry> {
        &self.plugins
    }

    pub fn calendars(&self) -> &Arc<CalendarFanOut> {
        &self.calendars
    }

    pub fn router(&self) -> &Arc<AgentRouter> {
        &self.router
    }
}
