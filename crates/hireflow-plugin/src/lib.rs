// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, loading, and invocation for the Hireflow agent runtime.
//!
//! Plugins are built from a static catalog of named factories. A plugin
//! directory may add further candidates through `<dir>/<name>/plugin.toml`
//! manifests that select one of those factories and supply settings.

pub mod catalog;
pub mod manifest;
pub mod registry;

pub use catalog::{builtin_catalog, factory_fn, PluginFactory};
pub use manifest::{parse_plugin_manifest, PluginManifest};
pub use registry::{LoadOutcome, PluginInfo, PluginRegistry};
