//! Generator configuration
//!
//! Per-server document metadata and per-operation overrides, loaded from a
//! TOML file that usually sits next to the server manifest:
//!
//! ```toml
//! [servers.v1.info]
//! title = "Blog API"
//! description = "Posts, comments and tags"
//! version = "1.0.0"
//!
//! [[servers.v1.tag_groups]]
//! name = "Content"
//! tags = ["Posts", "Comments"]
//!
//! [servers.v1.operations."posts.index"]
//! summary = "List every post"
//! tags = ["Content"]
//! ```
//!
//! Operation overrides are addressed by `{server_key}.{operation_id}`, which
//! is exactly the nesting above.

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};
use crate::spec::Info;

/// File name probed next to the manifest when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "openapi.toml";

/// Root of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeneratorConfig {
    /// Server key → server section
    #[serde(default)]
    pub servers: IndexMap<String, ServerConfig>,
}

/// Configuration for one server key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub info: InfoConfig,
    /// Emitted as the `x-tagGroups` extension
    #[serde(default)]
    pub tag_groups: Vec<TagGroupConfig>,
    /// Operation id → overrides
    #[serde(default)]
    pub operations: IndexMap<String, OperationOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoConfig {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagGroupConfig {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Overrides applied on top of the generated operation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OperationOverride {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Appended after the default resource tag
    #[serde(default)]
    pub tags: Vec<String>,
}

impl GeneratorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| GeneratorError::parse("generator config", e))
    }

    /// Section for `key`, or [`GeneratorError::MissingServerConfig`].
    pub fn server(&self, key: &str) -> Result<&ServerConfig> {
        self.servers
            .get(key)
            .ok_or_else(|| GeneratorError::MissingServerConfig {
                key: key.to_string(),
            })
    }
}

impl ServerConfig {
    pub fn operation(&self, operation_id: &str) -> Option<&OperationOverride> {
        self.operations.get(operation_id)
    }

    pub fn document_info(&self) -> Info {
        Info {
            title: self.info.title.clone(),
            summary: None,
            description: self.info.description.clone(),
            terms_of_service: None,
            version: self.info.version.clone(),
            contact: None,
            license: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Value of the `x-tagGroups` extension; `None` without groups.
    pub fn tag_groups(&self) -> Option<Value> {
        if self.tag_groups.is_empty() {
            return None;
        }
        let groups = self
            .tag_groups
            .iter()
            .map(|g| json!({"name": g.name, "tags": g.tags}))
            .collect();
        Some(Value::Array(groups))
    }
}

/// Load generator configuration from a TOML file
///
/// # Returns
///
/// Returns `Ok(Some(config))` if the file exists and parses,
/// `Ok(None)` if the file doesn't exist,
/// `Err` if the file exists but cannot be read or parsed.
pub fn load_generator_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!("Failed to read generator config: {}", config_path.display())
    })?;

    let config: GeneratorConfig = toml::from_str(&contents).with_context(|| {
        format!("Failed to parse generator config: {}", config_path.display())
    })?;

    Ok(Some(config))
}

/// Resolve the configuration path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. `openapi.toml` alongside the manifest
/// 3. None
pub fn resolve_config_path(explicit_path: Option<&Path>, manifest_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    let candidate = manifest_path.parent()?.join(DEFAULT_CONFIG_FILE);
    candidate.exists().then_some(candidate)
}
