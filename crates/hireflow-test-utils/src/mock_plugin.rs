// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugin with scripted lifecycle outcomes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use hireflow_core::{HireflowError, Plugin};

/// Shared counters observing a [`MockPlugin`]'s lifecycle from outside.
#[derive(Debug, Default)]
pub struct LifecycleCounters {
    pub initialized: AtomicUsize,
    pub cleaned_up: AtomicUsize,
    pub invoked: AtomicUsize,
}

impl LifecycleCounters {
    pub fn initialized(&self) -> usize {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn cleaned_up(&self) -> usize {
        self.cleaned_up.load(Ordering::SeqCst)
    }

    pub fn invoked(&self) -> usize {
        self.invoked.load(Ordering::SeqCst)
    }
}

/// A plugin exposing `ping` (returns `{"pong": <tag>}`) and `fail`.
pub struct MockPlugin {
    name: String,
    tag: String,
    fail_initialize: bool,
    counters: Arc<LifecycleCounters>,
}

impl MockPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            fail_initialize: false,
            counters: Arc::new(LifecycleCounters::default()),
        }
    }

    /// Value returned in `ping` replies, used to tell instances apart.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Make `initialize` fail.
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Share counters with the caller.
    pub fn with_counters(mut self, counters: Arc<LifecycleCounters>) -> Self {
        self.counters = counters;
        self
    }

    pub fn counters(&self) -> Arc<LifecycleCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn methods(&self) -> &[&'static str] {
        &["ping", "fail"]
    }

    async fn initialize(&self) -> Result<(), HireflowError> {
        self.counters.initialized.fetch_add(1, Ordering::SeqCst);
        if self.fail_initialize {
            return Err(HireflowError::Internal(format!(
                "{} refused to initialize",
                self.name
            )));
        }
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), HireflowError> {
        self.counters.cleaned_up.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn invoke(&self, method: &str, args: Value) -> Result<Value, HireflowError> {
        self.counters.invoked.fetch_add(1, Ordering::SeqCst);
        match method {
            "ping" => Ok(json!({ "pong": self.tag, "args": args })),
            _ => Err(HireflowError::Internal(format!("{method} failed on purpose"))),
        }
    }
}
