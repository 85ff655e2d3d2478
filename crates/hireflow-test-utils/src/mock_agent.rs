// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock agent that records received actions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use hireflow_core::{Agent, HireflowError};

/// Behaviour of a [`MockAgent`] when handling an action.
#[derive(Debug, Clone)]
enum Reply {
    /// Echo `{agent, action, data}`.
    Echo,
    /// Return a fixed value.
    Fixed(Value),
    /// Fail with an internal error.
    Fail(String),
}

/// An agent that records `(action, data)` pairs and replies per its script.
pub struct MockAgent {
    id: String,
    reply: Reply,
    delay: Option<Duration>,
    received: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockAgent {
    /// An agent that echoes each request back.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reply: Reply::Echo,
            delay: None,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always return `value`.
    pub fn replying(mut self, value: Value) -> Self {
        self.reply = Reply::Fixed(value);
        self
    }

    /// Always fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = Reply::Fail(message.into());
        self
    }

    /// Sleep for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, oldest first.
    pub async fn received(&self) -> Vec<(String, Value)> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, action: &str, data: Value) -> Result<Value, HireflowError> {
        self.received
            .lock()
            .await
            .push((action.to_string(), data.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Echo => Ok(json!({ "agent": self.id, "action": action, "data": data })),
            Reply::Fixed(value) => Ok(value.clone()),
            Reply::Fail(message) => Err(HireflowError::Internal(message.clone())),
        }
    }
}
