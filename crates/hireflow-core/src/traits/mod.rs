// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the Hireflow runtime.
//!
//! Every backend, plugin, and agent declares its contract by implementing one
//! of these traits. All use `#[async_trait]` for dynamic dispatch.

pub mod agent;
pub mod backend;
pub mod plugin;

pub use agent::Agent;
pub use backend::GenerationBackend;
pub use plugin::Plugin;
