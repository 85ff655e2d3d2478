// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugin catalog.
//!
//! Every loadable plugin comes from a named factory registered here (or
//! added by the embedding application). Nothing is imported by string.

use std::sync::Arc;

use async_trait::async_trait;
use hireflow_core::{HireflowError, Plugin};
use serde_json::{json, Value};

/// Builds plugin instances from manifest settings.
pub trait PluginFactory: Send + Sync {
    /// Catalog name; also the plugin name when loaded without a manifest.
    fn name(&self) -> &str;

    /// Construct a new, uninitialized instance.
    fn create(&self, settings: &Value) -> Result<Arc<dyn Plugin>, HireflowError>;
}

struct FnFactory<F> {
    name: String,
    build: F,
}

impl<F> PluginFactory for FnFactory<F>
where
    F: Fn(&Value) -> Result<Arc<dyn Plugin>, HireflowError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, settings: &Value) -> Result<Arc<dyn Plugin>, HireflowError> {
        (self.build)(settings)
    }
}

/// Wrap a closure as a named factory.
pub fn factory_fn<F>(name: impl Into<String>, build: F) -> Arc<dyn PluginFactory>
where
    F: Fn(&Value) -> Result<Arc<dyn Plugin>, HireflowError> + Send + Sync + 'static,
{
    Arc::new(FnFactory {
        name: name.into(),
        build,
    })
}

/// Factories for the plugins compiled into every Hireflow binary:
/// - `echo`: returns its arguments (wiring checks)
/// - `keyword-matcher`: scores text against a keyword list (resume screening)
pub fn builtin_catalog() -> Vec<Arc<dyn PluginFactory>> {
    vec![
        factory_fn("echo", |_| Ok(Arc::new(EchoPlugin) as Arc<dyn Plugin>)),
        factory_fn("keyword-matcher", |settings| {
            Ok(Arc::new(KeywordMatcherPlugin::from_settings(settings)?) as Arc<dyn Plugin>)
        }),
    ]
}

struct EchoPlugin;

#[async_trait]
impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        "echo"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn description(&self) -> &str {
        "Returns its arguments unchanged"
    }

    fn methods(&self) -> &[&'static str] {
        &["echo"]
    }

    async fn invoke(&self, _method: &str, args: Value) -> Result<Value, HireflowError> {
        Ok(args)
    }
}

/// Case-insensitive keyword screening.
///
/// `match` takes `{"text": "...", "keywords"?: [...]}` and returns
/// `{"matched": [...], "missing": [...], "score": 0.0..=1.0, "passed": bool}`.
struct KeywordMatcherPlugin {
    keywords: Vec<String>,
    threshold: f64,
}

impl KeywordMatcherPlugin {
    fn from_settings(settings: &Value) -> Result<Self, HireflowError> {
        let keywords = match settings.get("keywords") {
            None => Vec::new(),
            Some(value) => string_list(value).ok_or_else(|| {
                HireflowError::Config("keyword-matcher: keywords must be a list of strings".into())
            })?,
        };
        let threshold = match settings.get("threshold") {
            None => 0.6,
            Some(value) => value
                .as_f64()
                .filter(|t| (0.0..=1.0).contains(t))
                .ok_or_else(|| {
                    HireflowError::Config(
                        "keyword-matcher: threshold must be a number in 0..=1".into(),
                    )
                })?,
        };
        Ok(Self {
            keywords,
            threshold,
        })
    }

    fn score(&self, text: &str, keywords: &[String]) -> Value {
        let haystack = text.to_lowercase();
        let (matched, missing): (Vec<&String>, Vec<&String>) = keywords
            .iter()
            .partition(|k| haystack.contains(&k.to_lowercase()));
        let score = if keywords.is_empty() {
            0.0
        } else {
            matched.len() as f64 / keywords.len() as f64
        };
        json!({
            "matched": matched,
            "missing": missing,
            "score": score,
            "passed": !keywords.is_empty() && score >= self.threshold,
        })
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[async_trait]
impl Plugin for KeywordMatcherPlugin {
    fn name(&self) -> &str {
        "keyword-matcher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn description(&self) -> &str {
        "Scores text against a keyword list"
    }

    fn methods(&self) -> &[&'static str] {
        &["match", "keywords"]
    }

    async fn invoke(&self, method: &str, args: Value) -> Result<Value, HireflowError> {
        match method {
            "keywords" => Ok(json!(self.keywords)),
            "match" => {
                let text = args.get("text").and_then(Value::as_str).ok_or_else(|| {
                    HireflowError::Internal("match requires a string `text` argument".into())
                })?;
                let keywords = match args.get("keywords") {
                    Some(v) => string_list(v).ok_or_else(|| {
                        HireflowError::Internal("`keywords` must be a list of strings".into())
                    })?,
                    None => self.keywords.clone(),
                };
                Ok(self.score(text, &keywords))
            }
            other => Err(HireflowError::Internal(format!("unhandled method {other}"))),
        }
    }
}
