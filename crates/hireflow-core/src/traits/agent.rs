// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent trait for units addressable through the message router.

use async_trait::async_trait;

use crate::error::HireflowError;

/// A named unit exposing a single `handle(action, data)` entry point.
#[async_trait]
pub trait Agent: Send + Sync + 'static {
    /// Returns the id this agent is registered under.
    fn id(&self) -> &str;

    /// Handles one action with its JSON payload.
    async fn handle(
        &self,
        action: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, HireflowError>;
}
