use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

use super::{JsonApiServer, RawRoute, RouteSource, SampleResource, SchemaRegistry};

/// File-backed route table and server definitions.
///
/// ```yaml
/// routes:
///   - name: v1.posts.index
///     methods: [GET, HEAD]
///     uri: api/v1/posts
/// servers:
///   v1:
///     base_url: http://localhost/api/v1
///     schemas:
///       posts:
///         fields:
///           - { name: id, kind: id }
///           - { name: title, kind: string }
///     records:
///       posts:
///         - { id: "1", attributes: { title: Hello } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerManifest {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
    #[serde(default)]
    pub servers: IndexMap<String, ManifestServer>,
}

/// One server entry of a [`ServerManifest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestServer {
    /// Route name segment; defaults to the server key
    #[serde(default)]
    pub name: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub schemas: SchemaRegistry,
    /// Model → sample records
    #[serde(default)]
    pub records: IndexMap<String, Vec<SampleResource>>,
}

impl ServerManifest {
    /// Load a manifest, as YAML for `.yaml`/`.yml` files and JSON otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let what = format!("server manifest {}", path.display());
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml(&content).map_err(|e| match e {
                GeneratorError::Parse { message, .. } => GeneratorError::Parse { what, message },
                other => other,
            })
        } else {
            serde_json::from_str(&content).map_err(|e| GeneratorError::parse(what, e))
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GeneratorError::parse("server manifest", e))
    }

    /// Server for `key` bound to its name, or [`GeneratorError::UnknownServer`].
    pub fn server<'a>(&'a self, key: &'a str) -> Result<NamedServer<'a>> {
        let server = self
            .servers
            .get(key)
            .ok_or_else(|| GeneratorError::UnknownServer {
                key: key.to_string(),
            })?;
        Ok(NamedServer {
            name: server.name.as_deref().unwrap_or(key),
            server,
        })
    }
}

impl RouteSource for ServerManifest {
    fn routes(&self) -> &[RawRoute] {
        &self.routes
    }
}

/// A manifest server paired with its resolved name.
#[derive(Debug, Clone, Copy)]
pub struct NamedServer<'a> {
    name: &'a str,
    server: &'a ManifestServer,
}

impl JsonApiServer for NamedServer<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn base_url(&self) -> &str {
        &self.server.base_url
    }

    fn schemas(&self) -> &SchemaRegistry {
        &self.server.schemas
    }

    fn records(&self, model: &str) -> Vec<SampleResource> {
        self.server.records.get(model).cloned().unwrap_or_default()
    }
}
