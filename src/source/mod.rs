//! # Route and Server Sources
//!
//! Contracts for the collaborators the generator reads from: the host
//! framework's route table and the JSON:API server that owns resource
//! schemas and sample records. Both are traits so an embedding application
//! can hand over its live route table. [`ServerManifest`] is the
//! file-backed implementation used by the CLI and the tests.
mod manifest;
mod types;

pub use manifest::*;
pub use types::*;

/// Enumerable route table.
pub trait RouteSource {
    fn routes(&self) -> &[RawRoute];
}

/// A JSON:API server as seen by the generator.
pub trait JsonApiServer {
    /// Route-name segment identifying this server's routes.
    fn name(&self) -> &str;

    /// Absolute base URL, e.g. `http://localhost/api/v1`.
    fn base_url(&self) -> &str;

    fn schemas(&self) -> &SchemaRegistry;

    /// Records of `model` rendered as resources. Called at most once per
    /// model and generation run; callers only keep the first few.
    fn records(&self, model: &str) -> Vec<SampleResource>;
}
