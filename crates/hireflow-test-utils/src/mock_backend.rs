// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hireflow_core::{BackendInfo, GenerateOptions, GenerationBackend, HireflowError};

/// A mock backend that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty the
/// response is `"<name> response"`, which lets tests tell backends apart.
pub struct MockBackend {
    name: String,
    responses: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend with an empty response queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Pre-load responses returned in order.
    pub fn with_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = Arc::new(Mutex::new(VecDeque::from(responses)));
        self
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with a provider error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of `generate` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: self.name.clone(),
            model_id: format!("{}-mock", self.name),
            endpoint: "mock://local".into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<String, HireflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(HireflowError::Provider {
                message: message.clone(),
                source: None,
            });
        }

        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("{} response", self.name)))
    }
}
