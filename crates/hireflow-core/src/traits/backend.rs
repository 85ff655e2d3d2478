// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait for hosted text-generation models.

use async_trait::async_trait;

use crate::error::HireflowError;
use crate::types::{BackendInfo, GenerateOptions};

/// A concrete text-generation capability reachable by name.
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Returns the registry name of this backend.
    fn name(&self) -> &str;

    /// Returns descriptive model information.
    fn info(&self) -> BackendInfo;

    /// Generates text for the given prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, HireflowError>;
}
