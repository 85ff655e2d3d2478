// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent registry and request dispatch.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use hireflow_core::{Agent, ComponentKind, HireflowError};
use serde_json::Value;
use tracing::{debug, debug_span, info, warn, Instrument};
use uuid::Uuid;

/// Routes requests to agents by id.
///
/// Lookups clone the agent handle out of the map so no shard lock is held
/// while a handler runs. There are no retries.
#[derive(Default)]
pub struct AgentRouter {
    agents: DashMap<String, Arc<dyn Agent>>,
}

impl std::fmt::Debug for AgentRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRouter")
            .field("agents", &self.agent_ids())
            .finish()
    }
}

impl AgentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` under its id, replacing any previous handle.
    pub fn register(&self, agent: Arc<dyn Agent>) {
        let id = agent.id().to_string();
        if self.agents.insert(id.clone(), agent).is_some() {
            info!(agent = %id, "agent replaced");
        } else {
            debug!(agent = %id, "agent registered");
        }
    }

    /// Remove an agent. Returns true if it was registered.
    pub fn unregister(&self, id: &str) -> bool {
        self.agents.remove(id).is_some()
    }

    /// Deliver `action` with `data` to `target` and return its reply.
    pub async fn send(&self, target: &str, action: &str, data: Value) -> Result<Value, HireflowError> {
        let agent = self.lookup(target)?;
        let span = debug_span!("agent_request", request_id = %Uuid::new_v4(), agent = target, action);
        async {
            debug!("dispatching");
            agent
                .handle(action, data)
                .await
                .map_err(|e| handler_error(target, action, e))
        }
        .instrument(span)
        .await
    }

    /// [`send`](Self::send) bounded by `timeout`.
    pub async fn send_with_timeout(
        &self,
        target: &str,
        action: &str,
        data: Value,
        timeout: Duration,
    ) -> Result<Value, HireflowError> {
        let agent = self.lookup(target)?;
        let span = debug_span!("agent_request", request_id = %Uuid::new_v4(), agent = target, action);
        let call = agent.handle(action, data).instrument(span);
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(|e| handler_error(target, action, e)),
            Err(_) => {
                warn!(agent = target, action, ?timeout, "agent timed out");
                Err(HireflowError::Timeout { duration: timeout })
            }
        }
    }

    /// Registered ids, sorted.
    pub fn agent_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.agents.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn lookup(&self, target: &str) -> Result<Arc<dyn Agent>, HireflowError> {
        self.agents
            .get(target)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| HireflowError::not_found(ComponentKind::Agent, target))
    }
}

fn handler_error(agent: &str, action: &str, source: HireflowError) -> HireflowError {
    warn!(agent, action, error = %source, "agent handler failed");
    HireflowError::HandlerError {
        agent: agent.to_string(),
        action: action.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireflow_test_utils::MockAgent;
    use serde_json::json;

    #[tokio::test]
    async fn send_returns_handler_reply_unmodified() {
        let router = AgentRouter::new();
        let reply = json!({"status": "ok", "nested": {"items": [1, 2, 3]}, "none": null});
        router.register(Arc::new(MockAgent::new("tracker").replying(reply.clone())));

        let out = router.send("tracker", "status", json!({})).await.unwrap();
        assert_eq!(out, reply);
    }

    #[tokio::test]
    async fn unknown_target_invokes_nothing() {
        let router = AgentRouter::new();
        let agent = Arc::new(MockAgent::new("tracker"));
        router.register(agent.clone());

        let err = router
            .send("scheduler", "schedule", json!({"x": 1}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HireflowError::NotFound { kind: ComponentKind::Agent, ref name } if name == "scheduler"
        ));
        assert!(agent.received().await.is_empty());
    }

    #[tokio::test]
    async fn request_reaches_exactly_the_target() {
        let router = AgentRouter::new();
        let a = Arc::new(MockAgent::new("a"));
        let b = Arc::new(MockAgent::new("b"));
        router.register(a.clone());
        router.register(b.clone());

        router.send("b", "ping", json!({"n": 7})).await.unwrap();
        assert!(a.received().await.is_empty());
        assert_eq!(b.received().await, vec![("ping".to_string(), json!({"n": 7}))]);
    }

    #[tokio::test]
    async fn handler_failure_is_wrapped() {
        let router = AgentRouter::new();
        router.register(Arc::new(MockAgent::new("offer").failing("template missing")));

        let err = router.send("offer", "draft", json!({})).await.unwrap_err();
        match err {
            HireflowError::HandlerError { agent, action, source } => {
                assert_eq!(agent, "offer");
                assert_eq!(action, "draft");
                assert!(source.to_string().contains("template missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn reregistering_replaces_handle() {
        let router = AgentRouter::new();
        router.register(Arc::new(MockAgent::new("x").replying(json!(1))));
        router.register(Arc::new(MockAgent::new("x").replying(json!(2))));
        assert_eq!(router.len(), 1);
        assert_eq!(router.send("x", "any", Value::Null).await.unwrap(), json!(2));
    }

    #[tokio::test(start_paused = true)]
    async fn send_with_timeout_reports_timeout() {
        let router = AgentRouter::new();
        router.register(Arc::new(
            MockAgent::new("slow").with_delay(Duration::from_secs(10)),
        ));
        let err = router
            .send_with_timeout("slow", "work", Value::Null, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, HireflowError::Timeout { .. }));

        let err = router
            .send_with_timeout("ghost", "work", Value::Null, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sends_and_registrations() {
        let router = Arc::new(AgentRouter::new());
        router.register(Arc::new(MockAgent::new("echo")));

        let mut tasks = Vec::new();
        for i in 0..32 {
            let router = Arc::clone(&router);
            tasks.push(tokio::spawn(async move {
                if i % 8 == 0 {
                    router.register(Arc::new(MockAgent::new(format!("extra-{i}"))));
                }
                router.send("echo", "ping", json!({"i": i})).await
            }));
        }
        for task in tasks {
            let reply = task.await.unwrap().unwrap();
            assert_eq!(reply["agent"], "echo");
        }
        assert_eq!(router.len(), 5);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn unregister_removes_agent() {
        let router = AgentRouter::new();
        router.register(Arc::new(MockAgent::new("tmp")));
        router.register(Arc::new(MockAgent::new("tmp")));
        assert!(logs_contain("agent replaced"));
        assert!(router.unregister("tmp"));
        assert!(!router.unregister("tmp"));
        assert!(router.agent_ids().is_empty());
    }
}
