// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for plugin discovery, loading, and invocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hireflow_core::{HireflowError, Plugin};
use hireflow_plugin::{factory_fn, LoadOutcome, PluginRegistry};
use hireflow_test_utils::{LifecycleCounters, MockPlugin};
use serde_json::json;

fn mock_factory(name: &'static str) -> Arc<dyn hireflow_plugin::PluginFactory> {
    factory_fn(name, move |_| Ok(Arc::new(MockPlugin::new(name)) as Arc<dyn Plugin>))
}

fn write_manifest(root: &std::path::Path, dir: &str, body: &str) {
    let plugin_dir = root.join(dir);
    std::fs::create_dir_all(&plugin_dir).unwrap();
    std::fs::write(plugin_dir.join("plugin.toml"), body).unwrap();
}

#[tokio::test]
async fn builtin_catalog_loads_and_invokes() {
    let registry = PluginRegistry::with_builtin_catalog();
    assert_eq!(registry.discover(), vec!["echo", "keyword-matcher"]);

    let outcomes = registry.load_all().await;
    assert!(outcomes.values().all(LoadOutcome::is_loaded));
    assert_eq!(registry.loaded_names(), vec!["echo", "keyword-matcher"]);

    let out = registry
        .invoke("echo", "echo", json!({"hello": "world"}))
        .await
        .unwrap();
    assert_eq!(out, json!({"hello": "world"}));
}

#[tokio::test]
async fn load_all_isolates_failures() {
    let registry = PluginRegistry::new();
    registry.register_factory(mock_factory("alpha"));
    registry.register_factory(mock_factory("beta"));
    registry.register_factory(factory_fn("broken", |_| {
        Ok(Arc::new(MockPlugin::new("broken").failing_initialize()) as Arc<dyn Plugin>)
    }));

    let outcomes = registry.load_all().await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes["alpha"].is_loaded());
    assert!(outcomes["beta"].is_loaded());
    assert!(matches!(
        outcomes["broken"],
        LoadOutcome::Failed(HireflowError::ConstructionFailed { .. })
    ));

    assert_eq!(registry.loaded_names(), vec!["alpha", "beta"]);
    let err = registry
        .invoke("broken", "ping", json!(null))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn load_unknown_name_is_not_found() {
    let registry = PluginRegistry::with_builtin_catalog();
    let err = registry.load("does-not-exist").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn factory_error_is_construction_failure() {
    let registry = PluginRegistry::new();
    registry.register_factory(factory_fn("picky", |_| {
        Err(HireflowError::Config("missing api_url".into()))
    }));
    let err = registry.load("picky").await.unwrap_err();
    match err {
        HireflowError::ConstructionFailed { name, message } => {
            assert_eq!(name, "picky");
            assert!(message.contains("missing api_url"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(registry.loaded_names().is_empty());
}

#[tokio::test]
async fn reload_replaces_instance_and_cleans_up_previous() {
    let first = Arc::new(LifecycleCounters::default());
    let second = Arc::new(LifecycleCounters::default());
    let generation = Arc::new(AtomicUsize::new(0));

    let registry = PluginRegistry::new();
    {
        let first = Arc::clone(&first);
        let second = Arc::clone(&second);
        let generation = Arc::clone(&generation);
        registry.register_factory(factory_fn("screen", move |_| {
            let n = generation.fetch_add(1, Ordering::SeqCst);
            let counters = if n == 0 { &first } else { &second };
            Ok(Arc::new(
                MockPlugin::new("screen")
                    .with_tag(format!("gen-{n}"))
                    .with_counters(Arc::clone(counters)),
            ) as Arc<dyn Plugin>)
        }));
    }

    registry.load("screen").await.unwrap();
    let out = registry.invoke("screen", "ping", json!({})).await.unwrap();
    assert_eq!(out["pong"], "gen-0");

    registry.load("screen").await.unwrap();
    let out = registry.invoke("screen", "ping", json!({})).await.unwrap();
    assert_eq!(out["pong"], "gen-1");

    assert_eq!(first.cleaned_up(), 1);
    assert_eq!(second.cleaned_up(), 0);
    assert_eq!(second.initialized(), 1);
}

#[tokio::test]
async fn failed_reload_keeps_previous_instance() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let registry = PluginRegistry::new();
    {
        let attempts = Arc::clone(&attempts);
        registry.register_factory(factory_fn("flaky", move |_| {
            let plugin = MockPlugin::new("flaky").with_tag("stable");
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Arc::new(plugin) as Arc<dyn Plugin>)
            } else {
                Ok(Arc::new(plugin.failing_initialize()) as Arc<dyn Plugin>)
            }
        }));
    }

    registry.load("flaky").await.unwrap();
    assert!(registry.load("flaky").await.is_err());
    let out = registry.invoke("flaky", "ping", json!({})).await.unwrap();
    assert_eq!(out["pong"], "stable");
}

#[tokio::test]
async fn invoke_undeclared_method_is_rejected_without_calling() {
    let counters = Arc::new(LifecycleCounters::default());
    let registry = PluginRegistry::new();
    {
        let counters = Arc::clone(&counters);
        registry.register_factory(factory_fn("sentinel", move |_| {
            Ok(Arc::new(MockPlugin::new("sentinel").with_counters(Arc::clone(&counters)))
                as Arc<dyn Plugin>)
        }));
    }
    registry.load("sentinel").await.unwrap();

    let err = registry
        .invoke("sentinel", "delete_everything", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, HireflowError::NoSuchMethod { .. }));
    assert_eq!(counters.invoked(), 0);
}

#[tokio::test]
async fn plugin_error_is_wrapped_as_invocation_error() {
    let registry = PluginRegistry::new();
    registry.register_factory(mock_factory("sentinel"));
    registry.load("sentinel").await.unwrap();

    let err = registry.invoke("sentinel", "fail", json!({})).await.unwrap_err();
    match err {
        HireflowError::InvocationError { plugin, method, source } => {
            assert_eq!(plugin, "sentinel");
            assert_eq!(method, "fail");
            assert!(source.to_string().contains("failed on purpose"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unload_and_shutdown_run_cleanup() {
    let counters = Arc::new(LifecycleCounters::default());
    let registry = PluginRegistry::new();
    for name in ["one", "two"] {
        let counters = Arc::clone(&counters);
        registry.register_factory(factory_fn(name, move |_| {
            Ok(Arc::new(MockPlugin::new(name).with_counters(Arc::clone(&counters)))
                as Arc<dyn Plugin>)
        }));
    }
    registry.load_all().await;

    registry.unload("one").await.unwrap();
    assert_eq!(counters.cleaned_up(), 1);
    assert!(registry.unload("one").await.unwrap_err().is_not_found());

    registry.shutdown().await;
    assert_eq!(counters.cleaned_up(), 2);
    assert!(registry.loaded_names().is_empty());
}

#[tokio::test]
async fn plugin_dir_manifests_extend_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    write_manifest(
        tmp.path(),
        "backend-screen",
        r#"
[plugin]
factory = "keyword-matcher"
description = "Backend role screen"

[settings]
keywords = ["rust", "postgres"]
"#,
    );
    write_manifest(tmp.path(), "mystery", "[plugin]\nfactory = \"teleporter\"\n");
    write_manifest(tmp.path(), "garbled", "not = [valid");
    std::fs::create_dir_all(tmp.path().join("no-manifest")).unwrap();

    let registry = PluginRegistry::with_builtin_catalog().with_plugin_dir(tmp.path());
    assert_eq!(
        registry.discover(),
        vec!["backend-screen", "echo", "garbled", "keyword-matcher", "mystery"]
    );

    registry.load("backend-screen").await.unwrap();
    let screen = registry
        .describe()
        .into_iter()
        .find(|info| info.name == "backend-screen")
        .unwrap();
    assert_eq!(screen.description, "Backend role screen");
    let out = registry
        .invoke(
            "backend-screen",
            "match",
            json!({"text": "Built Rust services on Postgres"}),
        )
        .await
        .unwrap();
    assert_eq!(out["score"], 1.0);

    let err = registry.load("mystery").await.unwrap_err();
    assert!(matches!(err, HireflowError::MissingContract { .. }));

    let err = registry.load("garbled").await.unwrap_err();
    assert!(matches!(err, HireflowError::ConstructionFailed { .. }));

    assert!(registry.load("no-manifest").await.unwrap_err().is_not_found());
    assert!(registry.load("../escape").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn manifest_version_pin_is_enforced() {
    let tmp = tempfile::tempdir().unwrap();
    write_manifest(
        tmp.path(),
        "pinned",
        "[plugin]\nfactory = \"echo\"\nversion = \">=2.0\"\n",
    );
    let registry = PluginRegistry::with_builtin_catalog().with_plugin_dir(tmp.path());
    let err = registry.load("pinned").await.unwrap_err();
    assert!(err.to_string().contains("does not satisfy"));
}

#[tokio::test]
async fn disabled_names_are_not_discovered() {
    let registry = PluginRegistry::with_builtin_catalog().with_disabled(["echo"]);
    assert_eq!(registry.discover(), vec!["keyword-matcher"]);
    let outcomes = registry.load_all().await;
    assert!(!outcomes.contains_key("echo"));
    // Explicit loads still work.
    registry.load("echo").await.unwrap();
}

#[tokio::test]
async fn describe_lists_loaded_plugins() {
    let registry = PluginRegistry::with_builtin_catalog();
    registry.load("keyword-matcher").await.unwrap();
    let infos = registry.describe();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].name, "keyword-matcher");
    assert_eq!(infos[0].version, "0.1.0");
    assert_eq!(infos[0].methods, vec!["match", "keywords"]);
}

#[tokio::test]
async fn load_all_reports_broken_manifests() {
    let tmp = tempfile::tempdir().unwrap();
    write_manifest(tmp.path(), "mystery", "[plugin]\nfactory = \"teleporter\"\n");
    write_manifest(tmp.path(), "garbled", "not = [valid");

    let registry = PluginRegistry::with_builtin_catalog().with_plugin_dir(tmp.path());
    let outcomes = registry.load_all().await;

    assert_eq!(
        outcomes.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["echo", "garbled", "keyword-matcher", "mystery"]
    );
    assert!(matches!(
        outcomes["mystery"],
        LoadOutcome::Failed(HireflowError::MissingContract { .. })
    ));
    assert!(matches!(
        outcomes["garbled"],
        LoadOutcome::Failed(HireflowError::ConstructionFailed { .. })
    ));
    assert!(outcomes["echo"].is_loaded());
    assert!(outcomes["keyword-matcher"].is_loaded());
    assert_eq!(registry.loaded_names(), vec!["echo", "keyword-matcher"]);
}
