//! # Generator Module
//!
//! Assembles an OpenAPI 3.0.2 document for one JSON:API server from the
//! host framework's route table.
//!
//! ## Pipeline
//!
//! ```text
//! RouteSource ─▶ classify ─▶ RouteDescriptor ─▶ ActionDescriptor ─▶ Operation
//!                                  │                     │
//!                                  ▼                     ▼
//!                              path map          ComponentStore (shared)
//!                                  └──────────┬──────────┘
//!                                             ▼
//!                               Document ─▶ validate ─▶ YAML / JSON
//! ```
//!
//! 1. Routes whose name doesn't start with the server's segment are skipped.
//! 2. Each remaining route is classified into a [`RouteDescriptor`](crate::route::RouteDescriptor).
//! 3. The matching [`ActionDescriptor`](crate::descriptors::ActionDescriptor)
//!    builds parameters, request body and responses. Schemas, path
//!    parameters and other reusable pieces are registered once in the
//!    run's [`ComponentStore`](crate::components::ComponentStore) and
//!    referenced everywhere else.
//! 4. The document is validated as a whole; any issue fails the run and
//!    nothing is written.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jsonapi_openapi::config::GeneratorConfig;
//! use jsonapi_openapi::generator::OpenApiGenerator;
//! use jsonapi_openapi::source::ServerManifest;
//! use jsonapi_openapi::spec::OutputFormat;
//! use std::path::Path;
//!
//! # fn main() -> jsonapi_openapi::Result<()> {
//! let manifest = ServerManifest::load(Path::new("routes.yaml"))?;
//! let config = GeneratorConfig::from_toml(&std::fs::read_to_string("openapi.toml").unwrap())?;
//! let server = manifest.server("v1")?;
//! let path = OpenApiGenerator::new("v1", &manifest, &server, &config)
//!     .write(OutputFormat::Yaml, Path::new("storage/app"))?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```

mod context;
pub mod defaults;
mod operation;
mod paths;
pub mod parameters;
pub mod responses;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::route::RouteDescriptor;
use crate::source::{JsonApiServer, RouteSource};
use crate::spec::{
    write_document, Document, OutputFormat, Server, ServerVariable, OPENAPI_VERSION,
    TAG_GROUPS_EXTENSION,
};
use crate::validator::validate_document;

pub use context::GenerationContext;
pub use operation::build_operation;
pub use paths::{build_paths, classify_routes};

/// Name of the server URL variable in the `servers` entry.
pub const SERVER_URL_VARIABLE: &str = "serverURL";

/// Generates the document of one server.
pub struct OpenApiGenerator<'a> {
    key: &'a str,
    routes: &'a dyn RouteSource,
    server: &'a dyn JsonApiServer,
    config: &'a GeneratorConfig,
}

impl<'a> OpenApiGenerator<'a> {
    pub fn new(
        key: &'a str,
        routes: &'a dyn RouteSource,
        server: &'a dyn JsonApiServer,
        config: &'a GeneratorConfig,
    ) -> Self {
        OpenApiGenerator {
            key,
            routes,
            server,
            config,
        }
    }

    /// The server's classified routes, in route table order.
    pub fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        let server_config = self.config.server(self.key)?;
        let ctx = GenerationContext::new(self.server, server_config);
        classify_routes(
            self.routes.routes(),
            self.server.name(),
            self.server.base_url(),
            &ctx,
        )
    }

    /// Build and validate the document.
    ///
    /// # Errors
    ///
    /// Classification and lookup errors abort at the first occurrence.
    /// [`GeneratorError::Validation`] carries every structural issue found.
    pub fn generate(&self) -> Result<Document> {
        let server_config = self.config.server(self.key)?;
        let mut ctx = GenerationContext::new(self.server, server_config);
        defaults::register_defaults(&mut ctx.components);

        let routes = classify_routes(
            self.routes.routes(),
            self.server.name(),
            self.server.base_url(),
            &ctx,
        )?;
        debug!(server = self.key, routes = routes.len(), "Classified server routes");
        let paths = build_paths(&mut ctx, &routes)?;

        let mut variables = BTreeMap::new();
        variables.insert(
            SERVER_URL_VARIABLE.to_string(),
            ServerVariable {
                default: ctx.base_url().to_string(),
                substitutions_enum: Vec::new(),
                description: None,
                extensions: BTreeMap::new(),
            },
        );
        let mut extensions = BTreeMap::new();
        if let Some(tag_groups) = server_config.tag_groups() {
            extensions.insert(TAG_GROUPS_EXTENSION.to_string(), tag_groups);
        }
        let document = Document {
            openapi: OPENAPI_VERSION.to_string(),
            info: server_config.document_info(),
            servers: vec![Server {
                url: format!("{{{}}}", SERVER_URL_VARIABLE),
                description: None,
                variables,
                extensions: BTreeMap::new(),
            }],
            paths: Some(paths),
            components: Some(ctx.components.into_components()),
            security: Vec::new(),
            tags: Vec::new(),
            webhooks: BTreeMap::new(),
            external_docs: None,
            extensions,
        };

        let issues = validate_document(&document);
        if !issues.is_empty() {
            return Err(GeneratorError::Validation(issues));
        }
        info!(
            server = self.key,
            paths = document.paths.as_ref().map_or(0, BTreeMap::len),
            schemas = document.components.as_ref().map_or(0, |c| c.schemas.len()),
            "Generated OpenAPI document"
        );
        Ok(document)
    }

    /// Generate and write `{key}_openapi.{format}` under `dir`.
    pub fn write(&self, format: OutputFormat, dir: &Path) -> Result<PathBuf> {
        let document = self.generate()?;
        let path = write_document(&document, self.key, format, dir)?;
        info!(server = self.key, path = %path.display(), "Wrote OpenAPI document");
        Ok(path)
    }
}
