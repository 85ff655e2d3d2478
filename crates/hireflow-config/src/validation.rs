// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Only document-wide constraints live here. A single backend or credential
//! lacking its own required keys is not a validation failure; the registry
//! that consumes it leaves that entry absent.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::HireflowConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &HireflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.runtime.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "runtime.log_level `{}` must be one of: {}",
                config.runtime.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.runtime.default_backend.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "runtime.default_backend must not be empty".to_string(),
        });
    }

    if config.runtime.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "runtime.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.runtime.sync_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "runtime.sync_timeout_secs must be at least 1".to_string(),
        });
    }

    let mut seen_backends = HashSet::new();
    for (i, backend) in config.backends.iter().enumerate() {
        if backend.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("backends[{i}].name must not be empty"),
            });
        } else if !seen_backends.insert(backend.name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate backend name `{}` in [[backends]] array", backend.name),
            });
        }

        if !(0.0..=2.0).contains(&backend.temperature) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "backends[{i}].temperature must be between 0.0 and 2.0, got {}",
                    backend.temperature
                ),
            });
        }
    }

    let mut seen_services = HashSet::new();
    for (i, credential) in config.credentials.iter().enumerate() {
        if credential.service.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("credentials[{i}].service must not be empty"),
            });
        } else if !seen_services.insert(credential.service.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate credential service `{}` in [[credentials]] array",
                    credential.service
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
