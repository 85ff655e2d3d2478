// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime facade for the Hireflow agent core.
//!
//! [`Runtime`] owns the credential manager, backend registry, plugin
//! registry, calendar fan-out, and message router, and registers the
//! built-in agents:
//! - `generator`: text generation through the backend registry
//! - `interview_scheduler`: generate an interview arrangement and sync calendars
//! - `plugin_gateway`: invoke loaded plugins through the router

pub mod agents;
pub mod runtime;

pub use runtime::{Runtime, RuntimeStatus};
