// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin trait for independently loadable named capability units.

use async_trait::async_trait;

use crate::error::HireflowError;

/// An independently loadable capability unit.
///
/// Plugins declare the methods they answer to through [`Plugin::methods`];
/// the registry rejects calls to anything else before dispatching.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// Returns the plugin's name.
    fn name(&self) -> &str;

    /// Returns the semantic version of this plugin.
    fn version(&self) -> semver::Version;

    /// Returns a short description.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the method names this plugin can be invoked with.
    fn methods(&self) -> &[&'static str];

    /// Called once after construction, before the plugin becomes visible.
    async fn initialize(&self) -> Result<(), HireflowError> {
        Ok(())
    }

    /// Called when the plugin is replaced, unloaded, or the runtime shuts down.
    async fn cleanup(&self) -> Result<(), HireflowError> {
        Ok(())
    }

    /// Invokes one of the declared methods.
    async fn invoke(
        &self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, HireflowError>;
}
