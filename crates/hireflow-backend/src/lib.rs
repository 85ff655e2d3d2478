// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backends for the Hireflow agent runtime.
//!
//! This crate provides:
//! - [`BackendRegistry`]: named backends with an atomically switchable active one
//! - [`OpenAiCompatibleBackend`]: a `/chat/completions` client usable with any
//!   OpenAI-compatible endpoint (DashScope, OpenAI, local gateways)

pub mod openai;
pub mod registry;

pub use openai::OpenAiCompatibleBackend;
pub use registry::{BackendDescriptor, BackendRegistry};
