//! # jsonapi-openapi
//!
//! Generates an [OpenAPI 3.0.2](https://spec.openapis.org/oas/v3.0.2) document
//! for a JSON:API server from the host framework's route table and the
//! server's resource schemas.
//!
//! ## Overview
//!
//! Every route that belongs to the server is classified by its dotted name
//! (`{server}.{resource}[.{relation}].{action}`) into one of the standard
//! JSON:API actions, then turned into an operation with parameters, request
//! body and responses. Resource object schemas, relationship linkage and
//! path parameters are registered once under stable object ids and
//! referenced from every operation that needs them. Sample records from the
//! server provide example values.
//!
//! ## Architecture
//!
//! - **[`source`]** - Route table and JSON:API server contracts, plus the file-backed manifest
//! - **[`route`]** - Route classification into [`route::RouteDescriptor`]s
//! - **[`descriptors`]** - Resource schemas, filter parameters and per-action operation parts
//! - **[`components`]** - Build-once store behind the document's `components` section
//! - **[`resources`]** - Per-run cache of sample records used for examples
//! - **[`generator`]** - Document assembly, paths and default components
//! - **[`validator`]** - Structural checks on the assembled document
//! - **[`spec`]** - OpenAPI document model and YAML/JSON serialization
//! - **[`config`]** - Per-server document metadata and operation overrides
//! - **[`cli`]** - The `jsonapi-openapi` command
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(jsonapi-openapi)
//!     participant Manifest as source::ServerManifest
//!     participant Gen as generator::OpenApiGenerator
//!     participant Route as route::RouteDescriptor
//!     participant Action as descriptors::actions
//!     participant Store as components::ComponentStore
//!     participant Val as validator
//!     participant FS as File System
//!
//!     CLI->>Manifest: load("routes.yaml")
//!     CLI->>Gen: write(format, dir)
//!     Gen->>Store: register_defaults()
//!     loop every route of the server
//!         Gen->>Route: classify(route)
//!         Gen->>Action: resolve(descriptor)
//!         Action->>Store: schema_or_insert_with(object_id)
//!         Store-->>Action: $ref
//!         Action-->>Gen: Operation
//!     end
//!     Gen->>Val: validate_document(&document)
//!     Val-->>Gen: issues
//!     Gen->>FS: {server}_openapi.yaml
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jsonapi_openapi::config::GeneratorConfig;
//! use jsonapi_openapi::generator::OpenApiGenerator;
//! use jsonapi_openapi::source::ServerManifest;
//! use jsonapi_openapi::spec::{to_string, OutputFormat};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let manifest = ServerManifest::load(Path::new("routes.yaml"))?;
//! let config = GeneratorConfig::from_toml(&std::fs::read_to_string("openapi.toml")?)?;
//! let server = manifest.server("v1")?;
//! let document = OpenApiGenerator::new("v1", &manifest, &server, &config).generate()?;
//! println!("{}", to_string(&document, OutputFormat::Yaml)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`; see [`logging`] for the environment
//! variables controlling level and format.

pub mod cli;
pub mod components;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod generator;
pub mod inflect;
pub mod logging;
pub mod resources;
pub mod route;
pub mod runtime_config;
pub mod source;
pub mod spec;
pub mod validator;

pub use error::{GeneratorError, Result};
pub use generator::OpenApiGenerator;
pub use source::{JsonApiServer, RouteSource, ServerManifest};
pub use spec::{Document, OutputFormat};
