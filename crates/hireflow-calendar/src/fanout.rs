// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent dispatch of one event to every configured integration.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use hireflow_config::model::CalendarIntegrationConfig;
use hireflow_core::HireflowError;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::event::InterviewDetails;
use crate::providers::{builtin_providers, CalendarProvider};

/// Per-integration result of a fan-out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncOutcome {
    Skipped { message: String },
    Error { message: String },
    Success { message: String, data: Value },
}

impl SyncOutcome {
    /// `"skipped"`, `"error"`, or `"success"`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => "skipped",
            Self::Error { .. } => "error",
            Self::Success { .. } => "success",
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Fans an [`InterviewDetails`] event out to configured calendar integrations.
pub struct CalendarFanOut {
    integrations: BTreeMap<String, CalendarIntegrationConfig>,
    providers: HashMap<String, Arc<dyn CalendarProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for CalendarFanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarFanOut")
            .field("integrations", &self.integrations.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CalendarFanOut {
    /// Built-in providers over the given integrations.
    pub fn new(
        integrations: BTreeMap<String, CalendarIntegrationConfig>,
        timeout: Duration,
    ) -> Self {
        let mut fan_out = Self {
            integrations,
            providers: HashMap::new(),
            timeout,
        };
        for provider in builtin_providers() {
            fan_out.add_provider(provider);
        }
        fan_out
    }

    /// Add or replace the provider serving `provider.name()`.
    pub fn add_provider(&mut self, provider: Arc<dyn CalendarProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Configured integration names, sorted.
    pub fn integration_names(&self) -> Vec<&str> {
        self.integrations.keys().map(String::as_str).collect()
    }

    /// Dispatch `event` to every integration concurrently.
    ///
    /// The result has exactly one entry per configured integration.
    pub async fn fan_out(&self, event: &InterviewDetails) -> BTreeMap<String, SyncOutcome> {
        let tasks = self
            .integrations
            .iter()
            .map(|(name, config)| async move { (name.clone(), self.sync_one(name, config, event).await) });
        futures::future::join_all(tasks).await.into_iter().collect()
    }

    /// Check every integration without syncing: `Ok` when it would be
    /// dispatched, else the outcome a fan-out would report for it.
    pub fn preflight(&self) -> BTreeMap<String, Result<(), SyncOutcome>> {
        self.integrations
            .iter()
            .map(|(name, config)| (name.clone(), self.precheck(name, config).map(|_| ())))
            .collect()
    }

    fn precheck(
        &self,
        name: &str,
        config: &CalendarIntegrationConfig,
    ) -> Result<&Arc<dyn CalendarProvider>, SyncOutcome> {
        if !config.enabled {
            return Err(SyncOutcome::Skipped {
                message: "integration not enabled".into(),
            });
        }

        let provider = self
            .providers
            .get(name)
            .ok_or_else(|| {
                SyncOutcome::error(
                    HireflowError::Unsupported {
                        target: name.to_string(),
                    }
                    .to_string(),
                )
            })?;

        let missing: Vec<&str> = provider
            .required_settings()
            .iter()
            .copied()
            .filter(|key| config.settings.get(*key).is_none_or(|v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(SyncOutcome::error(format!(
                "missing {name} settings: {}",
                missing.join(", ")
            )));
        }
        Ok(provider)
    }

    async fn sync_one(
        &self,
        name: &str,
        config: &CalendarIntegrationConfig,
        event: &InterviewDetails,
    ) -> SyncOutcome {
        let provider = match self.precheck(name, config) {
            Ok(provider) => provider,
            Err(outcome) => {
                debug!(integration = name, status = outcome.status(), "calendar not dispatched");
                return outcome;
            }
        };

        match tokio::time::timeout(self.timeout, provider.sync(event, &config.settings)).await {
            Ok(Ok(data)) => {
                debug!(integration = name, "calendar sync succeeded");
                SyncOutcome::Success {
                    message: format!("synced to {name}"),
                    data,
                }
            }
            Ok(Err(e)) => {
                warn!(integration = name, error = %e, "calendar sync failed");
                SyncOutcome::error(format!("sync failed: {e}"))
            }
            Err(_) => {
                warn!(integration = name, timeout = ?self.timeout, "calendar sync timed out");
                SyncOutcome::error(format!("sync timed out after {:?}", self.timeout))
            }
        }
    }
}
