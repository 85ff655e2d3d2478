// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hireflow agent runtime.
//!
//! This crate provides the capability traits, error taxonomy, and common types
//! shared by the backend registry, plugin registry, credential manager, and
//! message router.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, HireflowError};
pub use types::{BackendInfo, ComponentKind, GenerateOptions, HealthStatus};

pub use traits::{Agent, GenerationBackend, Plugin};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_kind_and_name() {
        let err = HireflowError::not_found(ComponentKind::Agent, "scheduler");
        assert_eq!(err.to_string(), "Agent not found: scheduler");
        assert!(err.is_not_found());
        assert!(!HireflowError::NoActiveBackend.is_not_found());
    }

    #[test]
    fn handler_error_keeps_underlying_cause() {
        use std::error::Error;

        let err = HireflowError::HandlerError {
            agent: "generator".into(),
            action: "generate".into(),
            source: Box::new(HireflowError::NoActiveBackend),
        };
        let msg = err.to_string();
        assert!(msg.contains("generator"));
        assert!(msg.contains("no active generation backend"));
        assert!(err.source().is_some());
    }

    #[test]
    fn component_kind_round_trips_through_strings() {
        use std::str::FromStr;

        let kinds = [
            ComponentKind::Backend,
            ComponentKind::Plugin,
            ComponentKind::Agent,
            ComponentKind::Credential,
        ];
        for kind in &kinds {
            let parsed = ComponentKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn generate_options_with_timeout_leaves_rest_unset() {
        let opts = GenerateOptions::with_timeout(std::time::Duration::from_secs(5));
        assert_eq!(opts.timeout, Some(std::time::Duration::from_secs(5)));
        assert!(opts.temperature.is_none());
        assert!(opts.max_tokens.is_none());
    }

    #[test]
    fn all_capability_traits_are_exported() {
        fn _assert_backend<T: GenerationBackend>() {}
        fn _assert_plugin<T: Plugin>() {}
        fn _assert_agent<T: Agent>() {}
    }
}
