// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named generation backends with one atomically switchable active backend.
//!
//! The name table sits behind an `RwLock` that is only held for lookups and
//! inserts; the active backend is an [`ArcSwapOption`] so readers never block
//! on a switch. Network calls always run on a cloned `Arc` after every lock
//! has been released.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use arc_swap::ArcSwapOption;
use hireflow_config::model::{BackendConfig, HireflowConfig};
use hireflow_core::{
    BackendInfo, ComponentKind, GenerateOptions, GenerationBackend, HireflowError,
};
use hireflow_vault::CredentialManager;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::openai::OpenAiCompatibleBackend;

/// Endpoint and model used for a backend named `qwen` when the config omits them.
const QWEN_DEFAULT_ENDPOINT: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
const QWEN_DEFAULT_MODEL: &str = "qwen-plus";

/// A constructed backend and its model metadata.
pub struct BackendDescriptor {
    pub info: BackendInfo,
    pub backend: Arc<dyn GenerationBackend>,
}

impl BackendDescriptor {
    /// Wrap a backend, capturing its info once.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            info: backend.info(),
            backend,
        }
    }
}

impl std::fmt::Debug for BackendDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDescriptor")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Registry of generation backends.
#[derive(Default)]
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Arc<BackendDescriptor>>>,
    active: ArcSwapOption<BackendDescriptor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `[[backends]]`, resolving keys through
    /// `credentials` and then the process environment.
    pub fn from_config(config: &HireflowConfig, credentials: &CredentialManager) -> Self {
        Self::from_config_with_env(config, credentials, |key| std::env::var(key).ok())
    }

    /// Like [`from_config`](Self::from_config) with an explicit environment lookup.
    ///
    /// Each backend is constructed independently; one that is incomplete or has
    /// no API key is skipped with a warning. The configured default backend is
    /// activated when it was constructed.
    pub fn from_config_with_env<F>(
        config: &HireflowConfig,
        credentials: &CredentialManager,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let registry = Self::new();

        for entry in &config.backends {
            let Some(info) = backend_info(entry) else {
                warn!(backend = %entry.name, "backend has no endpoint or model_id, skipping");
                continue;
            };
            let Some(api_key) = resolve_api_key(entry, credentials, &env) else {
                warn!(
                    backend = %entry.name,
                    env_var = %entry.api_key_env_var(),
                    "no API key for backend, skipping"
                );
                continue;
            };
            match OpenAiCompatibleBackend::new(info, &api_key) {
                Ok(backend) => registry.register(&entry.name, BackendDescriptor::new(Arc::new(backend))),
                Err(e) => warn!(backend = %entry.name, error = %e, "backend construction failed"),
            }
        }

        let default = &config.runtime.default_backend;
        match registry.set_active(default) {
            Ok(()) => info!(backend = %default, "default backend activated"),
            Err(_) => warn!(
                backend = %default,
                available = ?registry.list_available(),
                "default backend unavailable, no backend active"
            ),
        }
        registry
    }

    /// Insert or replace the backend registered under `name`.
    ///
    /// Replacing does not change which descriptor is active; call
    /// [`set_active`](Self::set_active) again to switch to the new one.
    pub fn register(&self, name: &str, descriptor: BackendDescriptor) {
        debug!(backend = name, model = %descriptor.info.model_id, "backend registered");
        self.backends
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(descriptor));
    }

    /// Make `name` the active backend.
    ///
    /// An unregistered name leaves the current active backend unchanged.
    pub fn set_active(&self, name: &str) -> Result<(), HireflowError> {
        let backends = self.backends.read().unwrap_or_else(PoisonError::into_inner);
        let descriptor = backends
            .get(name)
            .ok_or_else(|| HireflowError::not_found(ComponentKind::Backend, name))?;
        self.active.store(Some(Arc::clone(descriptor)));
        info!(backend = name, "active backend switched");
        Ok(())
    }

    /// Generate text with the named backend if registered, else the active one.
    ///
    /// `options.timeout` bounds the network step.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
        backend_name: Option<&str>,
    ) -> Result<String, HireflowError> {
        let descriptor = backend_name
            .and_then(|name| self.get(name))
            .or_else(|| self.active.load_full())
            .ok_or(HireflowError::NoActiveBackend)?;

        debug!(backend = %descriptor.info.name, "dispatching generation");
        let call = descriptor.backend.generate(prompt, options);
        match options.timeout {
            Some(duration) => tokio::time::timeout(duration, call)
                .await
                .map_err(|_| HireflowError::Timeout { duration })?,
            None => call.await,
        }
    }

    /// Names of all successfully constructed backends.
    pub fn list_available(&self) -> BTreeSet<String> {
        self.backends
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Look up a registered backend.
    pub fn get(&self, name: &str) -> Option<Arc<BackendDescriptor>> {
        self.backends
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Name of the active backend.
    pub fn active_name(&self) -> Option<String> {
        self.active.load().as_ref().map(|d| d.info.name.clone())
    }

    /// Model info for the active backend.
    pub fn active_info(&self) -> Option<BackendInfo> {
        self.active.load().as_ref().map(|d| d.info.clone())
    }

    pub fn len(&self) -> usize {
        self.backends
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn backend_info(entry: &BackendConfig) -> Option<BackendInfo> {
    let (default_endpoint, default_model) = if entry.name == "qwen" {
        (Some(QWEN_DEFAULT_ENDPOINT), Some(QWEN_DEFAULT_MODEL))
    } else {
        (None, None)
    };
    let endpoint = entry.endpoint.as_deref().or(default_endpoint)?;
    let model_id = entry.model_id.as_deref().or(default_model)?;
    Some(BackendInfo {
        name: entry.name.clone(),
        model_id: model_id.to_string(),
        endpoint: endpoint.to_string(),
        temperature: entry.temperature,
        max_tokens: entry.max_tokens,
    })
}

/// Credential manager first (the configured service, else the backend
/// name), then the backend's environment variable.
fn resolve_api_key<F>(
    entry: &BackendConfig,
    credentials: &CredentialManager,
    env: &F,
) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let service = entry.credential.as_deref().unwrap_or(&entry.name);
    let origin = format!("backend:{}", entry.name);
    credentials.get_from(service, &origin).or_else(|| {
        env(&entry.api_key_env_var())
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    })
}
