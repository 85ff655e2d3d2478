// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every Hireflow runtime component.

use std::time::Duration;

use thiserror::Error;

use crate::types::ComponentKind;

/// Boxed error used to carry the underlying cause of a downstream failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Hireflow registries and capabilities.
#[derive(Debug, Error)]
pub enum HireflowError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A named component was not found in its registry.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ComponentKind, name: String },

    /// A component could not be constructed or initialized.
    #[error("failed to construct {name}: {message}")]
    ConstructionFailed { name: String, message: String },

    /// A candidate exists but does not expose the required capability surface.
    #[error("{name} does not satisfy the plugin contract")]
    MissingContract { name: String },

    /// A credential exists but its expiry has passed.
    #[error("credential for {service} has expired")]
    Expired { service: String },

    /// No generation backend has been activated.
    #[error("no active generation backend")]
    NoActiveBackend,

    /// A loaded plugin does not declare the requested method.
    #[error("plugin {plugin} has no method `{method}`")]
    NoSuchMethod { plugin: String, method: String },

    /// An agent handler raised an error while processing an action.
    #[error("agent {agent} failed to handle `{action}`: {source}")]
    HandlerError {
        agent: String,
        action: String,
        source: BoxError,
    },

    /// A plugin method raised an error.
    #[error("plugin {plugin} failed in `{method}`: {source}")]
    InvocationError {
        plugin: String,
        method: String,
        source: BoxError,
    },

    /// Generation backend errors (HTTP failure, bad response, auth rejected).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<BoxError>,
    },

    /// An agent does not handle the requested action.
    #[error("agent {agent} does not handle `{action}`")]
    UnknownAction { agent: String, action: String },

    /// A request payload is missing fields or has the wrong shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A fan-out target name is not recognized.
    #[error("Unsupported target: {target}")]
    Unsupported { target: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HireflowError {
    /// Shorthand for a [`HireflowError::NotFound`] of the given kind.
    pub fn not_found(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Returns true if this error is a registry lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
