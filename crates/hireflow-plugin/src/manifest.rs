// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.

use hireflow_core::HireflowError;
use serde::Deserialize;

/// Parsed `plugin.toml`. The plugin's name is its directory name.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginManifest {
    /// Catalog factory that builds this plugin.
    pub factory: String,
    /// Optional semantic version pin for the factory's plugin.
    pub version: Option<semver::VersionReq>,
    pub description: Option<String>,
    /// The `[settings]` table, handed to the factory as JSON.
    pub settings: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginManifestFile {
    plugin: PluginSection,
    #[serde(default)]
    settings: Option<toml::Table>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    factory: String,
    version: Option<String>,
    description: Option<String>,
}

/// Parse a plugin manifest from TOML content.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, HireflowError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| HireflowError::Config(format!("invalid plugin manifest: {e}")))?;

    let section = file.plugin;
    if section.factory.trim().is_empty() {
        return Err(HireflowError::Config(
            "plugin manifest: factory must not be empty".to_string(),
        ));
    }

    let version = section
        .version
        .as_deref()
        .map(semver::VersionReq::parse)
        .transpose()
        .map_err(|e| HireflowError::Config(format!("plugin manifest: invalid version: {e}")))?;

    let settings = match file.settings {
        Some(table) => serde_json::to_value(table)
            .map_err(|e| HireflowError::Config(format!("plugin manifest: bad settings: {e}")))?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    Ok(PluginManifest {
        factory: section.factory,
        version,
        description: section.description,
        settings,
    })
}
