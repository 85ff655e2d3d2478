// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hireflow integration tests.
//!
//! Provides mock capabilities for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockBackend`] - Generation backend with queued responses and failure modes
//! - [`MockAgent`] - Agent that records every action it receives
//! - [`MockPlugin`] - Plugin with scripted initialize/cleanup outcomes

pub mod mock_agent;
pub mod mock_backend;
pub mod mock_plugin;

pub use mock_agent::MockAgent;
pub use mock_backend::MockBackend;
pub use mock_plugin::{LifecycleCounters, MockPlugin};
