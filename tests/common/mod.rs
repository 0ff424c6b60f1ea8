#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use jsonapi_openapi::config::GeneratorConfig;
use jsonapi_openapi::{Document, OpenApiGenerator, ServerManifest};
use serde_json::Value;

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn manifest() -> ServerManifest {
    ServerManifest::load(&fixture("blog.yaml")).unwrap()
}

pub fn config() -> GeneratorConfig {
    GeneratorConfig::from_toml(&std::fs::read_to_string(fixture("openapi.toml")).unwrap()).unwrap()
}

/// Generate the blog `v1` document.
pub fn blog_document() -> Document {
    let manifest = manifest();
    let config = config();
    let server = manifest.server("v1").unwrap();
    OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap()
}

/// The blog document as JSON, for path-style assertions.
pub fn blog_json() -> Value {
    serde_json::to_value(blog_document()).unwrap()
}
