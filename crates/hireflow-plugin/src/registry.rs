// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry: discovery, attempt-then-replace loading, and invocation.
//!
//! A plugin is only stored after its factory and `initialize` both succeed,
//! so a failed load never disturbs an already loaded instance. Replacing a
//! loaded plugin runs the previous instance's `cleanup` after the new one is
//! visible. Invocation clones the instance out of the read lock before
//! calling into it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use hireflow_config::model::PluginConfig;
use hireflow_core::{ComponentKind, HireflowError, Plugin};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{builtin_catalog, PluginFactory};
use crate::manifest::{parse_plugin_manifest, PluginManifest};

/// Manifest file looked for in each plugin subdirectory.
const MANIFEST_FILE: &str = "plugin.toml";

/// Result of loading one plugin during [`PluginRegistry::load_all`].
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    Failed(HireflowError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Summary of a loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub methods: Vec<String>,
}

/// How a candidate name would be built.
enum Candidate {
    Catalog(Arc<dyn PluginFactory>),
    Manifest { dir: PathBuf, manifest: Result<PluginManifest, HireflowError> },
}

/// A loaded instance plus the description its manifest gave it, if any.
struct LoadedPlugin {
    instance: Arc<dyn Plugin>,
    description: Option<String>,
}

/// Registry of loaded plugins backed by a factory catalog.
pub struct PluginRegistry {
    factories: RwLock<BTreeMap<String, Arc<dyn PluginFactory>>>,
    loaded: RwLock<HashMap<String, LoadedPlugin>>,
    plugin_dir: Option<PathBuf>,
    disabled: BTreeSet<String>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("loaded", &self.loaded_names())
            .field("plugin_dir", &self.plugin_dir)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// An empty registry with no factories and no plugin directory.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(BTreeMap::new()),
            loaded: RwLock::new(HashMap::new()),
            plugin_dir: None,
            disabled: BTreeSet::new(),
        }
    }

    /// A registry seeded with [`builtin_catalog`].
    pub fn with_builtin_catalog() -> Self {
        let registry = Self::new();
        for factory in builtin_catalog() {
            registry.register_factory(factory);
        }
        registry
    }

    /// Built-in catalog plus the `[plugins]` section.
    pub fn from_config(config: &PluginConfig) -> Self {
        let mut registry = Self::with_builtin_catalog();
        registry.plugin_dir = config.dir.as_ref().map(PathBuf::from);
        registry.disabled = config.disabled.iter().cloned().collect();
        registry
    }

    /// Enable filesystem discovery under `dir`.
    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    /// Exclude names from discovery (and therefore from `load_all`).
    pub fn with_disabled<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add or replace a catalog factory.
    pub fn register_factory(&self, factory: Arc<dyn PluginFactory>) {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(factory.name().to_string(), factory);
    }

    fn factory(&self, name: &str) -> Option<Arc<dyn PluginFactory>> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Candidate names: catalog factories plus every plugin-directory entry
    /// holding a manifest. Disabled names are excluded.
    ///
    /// Manifests are not parsed here; an unreadable one or one naming an
    /// unknown factory is reported when the candidate is loaded.
    pub fn discover(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();

        names.extend(self.scan_plugin_dir());

        names.retain(|n| !self.disabled.contains(n));
        names.into_iter().collect()
    }

    /// Load (or reload) `name`.
    ///
    /// The previous instance, if any, stays visible until the new one has
    /// been constructed and initialized, and is cleaned up afterwards.
    pub async fn load(&self, name: &str) -> Result<(), HireflowError> {
        let (factory, settings, version_req, description) = match self.candidate(name) {
            None => return Err(HireflowError::not_found(ComponentKind::Plugin, name)),
            Some(Candidate::Catalog(factory)) => {
                (factory, Value::Object(Default::default()), None, None)
            }
            Some(Candidate::Manifest { dir, manifest }) => {
                let manifest = manifest.map_err(|e| HireflowError::ConstructionFailed {
                    name: name.to_string(),
                    message: format!("{}: {e}", dir.display()),
                })?;
                let factory = self.factory(&manifest.factory).ok_or_else(|| {
                    HireflowError::MissingContract {
                        name: name.to_string(),
                    }
                })?;
                (factory, manifest.settings, manifest.version, manifest.description)
            }
        };

        let plugin = factory
            .create(&settings)
            .map_err(|e| HireflowError::ConstructionFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let version = plugin.version();
        if let Some(req) = &version_req
            && !req.matches(&version)
        {
            return Err(HireflowError::ConstructionFailed {
                name: name.to_string(),
                message: format!("version {version} does not satisfy {req}"),
            });
        }

        plugin
            .initialize()
            .await
            .map_err(|e| HireflowError::ConstructionFailed {
                name: name.to_string(),
                message: format!("initialize failed: {e}"),
            })?;

        let previous = self
            .loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                name.to_string(),
                LoadedPlugin {
                    instance: plugin,
                    description,
                },
            );
        info!(plugin = name, %version, reloaded = previous.is_some(), "plugin loaded");

        if let Some(previous) = previous
            && let Err(e) = previous.instance.cleanup().await
        {
            warn!(plugin = name, error = %e, "cleanup of replaced plugin failed");
        }
        Ok(())
    }

    /// Load every discovered candidate independently.
    pub async fn load_all(&self) -> BTreeMap<String, LoadOutcome> {
        let names = self.discover();
        let results =
            futures::future::join_all(names.iter().map(|name| self.load(name))).await;

        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| {
                let outcome = match result {
                    Ok(()) => LoadOutcome::Loaded,
                    Err(e) => {
                        warn!(plugin = %name, error = %e, "plugin failed to load");
                        LoadOutcome::Failed(e)
                    }
                };
                (name, outcome)
            })
            .collect()
    }

    /// Call `method` on a loaded plugin.
    pub async fn invoke(
        &self,
        name: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, HireflowError> {
        let plugin = self
            .get(name)
            .ok_or_else(|| HireflowError::not_found(ComponentKind::Plugin, name))?;

        if !plugin.methods().contains(&method) {
            return Err(HireflowError::NoSuchMethod {
                plugin: name.to_string(),
                method: method.to_string(),
            });
        }

        plugin
            .invoke(method, args)
            .await
            .map_err(|e| HireflowError::InvocationError {
                plugin: name.to_string(),
                method: method.to_string(),
                source: Box::new(e),
            })
    }

    /// Remove a loaded plugin and run its `cleanup`.
    pub async fn unload(&self, name: &str) -> Result<(), HireflowError> {
        let plugin = self
            .loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .ok_or_else(|| HireflowError::not_found(ComponentKind::Plugin, name))?;
        plugin.instance.cleanup().await?;
        info!(plugin = name, "plugin unloaded");
        Ok(())
    }

    /// Clean up and drop every loaded plugin. Cleanup errors are logged.
    pub async fn shutdown(&self) {
        let drained: Vec<(String, LoadedPlugin)> = self
            .loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        for (name, plugin) in drained {
            if let Err(e) = plugin.instance.cleanup().await {
                warn!(plugin = %name, error = %e, "plugin cleanup failed during shutdown");
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|loaded| Arc::clone(&loaded.instance))
    }

    /// Loaded plugin names, sorted.
    pub fn loaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Summaries of loaded plugins, sorted by name.
    ///
    /// A manifest's `description` takes precedence over the plugin's own.
    pub fn describe(&self) -> Vec<PluginInfo> {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        let mut infos: Vec<PluginInfo> = loaded
            .iter()
            .map(|(name, loaded)| {
                let plugin = &loaded.instance;
                PluginInfo {
                    name: name.clone(),
                    version: plugin.version().to_string(),
                    description: loaded
                        .description
                        .clone()
                        .unwrap_or_else(|| plugin.description().to_string()),
                    methods: plugin.methods().iter().map(|m| m.to_string()).collect(),
                }
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Manifest entries shadow catalog names of the same name.
    fn candidate(&self, name: &str) -> Option<Candidate> {
        if let Some(dir) = &self.plugin_dir {
            let plugin_dir = dir.join(name);
            let path = plugin_dir.join(MANIFEST_FILE);
            if is_plain_name(name) && path.is_file() {
                return Some(Candidate::Manifest {
                    manifest: read_manifest(&path),
                    dir: plugin_dir,
                });
            }
        }
        self.factory(name).map(Candidate::Catalog)
    }

    /// Names of the subdirectories holding a manifest.
    fn scan_plugin_dir(&self) -> Vec<String> {
        let Some(dir) = &self.plugin_dir else {
            return Vec::new();
        };
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "plugin directory not readable");
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join(MANIFEST_FILE).is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| is_plain_name(name))
            .collect()
    }
}

fn read_manifest(path: &Path) -> Result<PluginManifest, HireflowError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| HireflowError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse_plugin_manifest(&content)
}

/// Rejects path separators and relative components in plugin names.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
