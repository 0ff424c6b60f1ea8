#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::GeneratorConfig;
use crate::descriptors::schema::{resource_schema, ResourceContext};
use crate::route::{base_path, ActionKind};
use crate::source::{JsonApiServer, RawRoute, ServerManifest};
use crate::spec::{ObjectOrReference, ObjectOrReferenceExt, ParameterIn, PathItemExt};

const BLOG: &str = include_str!("../../tests/fixtures/blog.yaml");
const CONFIG: &str = include_str!("../../tests/fixtures/openapi.toml");

fn fixtures() -> (ServerManifest, GeneratorConfig) {
    (
        ServerManifest::from_yaml(BLOG).unwrap(),
        GeneratorConfig::from_toml(CONFIG).unwrap(),
    )
}

fn classify(manifest: &ServerManifest, name: &str) -> RouteDescriptor {
    let server = manifest.server("v1").unwrap();
    let raw = manifest.routes.iter().find(|r| r.name == name).unwrap();
    RouteDescriptor::classify(
        raw,
        server.name(),
        &base_path(server.base_url()),
        server.schemas(),
    )
    .unwrap()
}

fn statuses(operation: &crate::spec::Operation) -> Vec<&str> {
    operation
        .responses
        .iter()
        .flatten()
        .map(|(status, _)| status.as_str())
        .collect()
}

#[test]
fn test_index_operation_shell() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());
    defaults::register_defaults(&mut ctx.components);

    let route = classify(&manifest, "v1.posts.index");
    let op = build_operation(&mut ctx, &route).unwrap().unwrap();
    assert_eq!(op.operation_id.as_deref(), Some("posts.index"));
    assert_eq!(op.summary.as_deref(), Some("List every post"));
    assert_eq!(op.tags, vec!["Posts", "Content"]);
    assert_eq!(statuses(&op), vec!["200", "400", "401", "403"]);
    assert!(op.request_body.is_none());

    let names: Vec<String> = op
        .parameters
        .iter()
        .map(|p| match p {
            ObjectOrReference::Ref { ref_path, .. } => ref_path.clone(),
            ObjectOrReference::Object(p) => p.name.clone(),
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "#/components/parameters/pageNumber",
            "#/components/parameters/pageSize",
            "sort",
            "filter[id]",
            "filter[slug]",
            "filter[published]",
            "filter[withTrashed]",
        ]
    );
}

#[test]
fn test_store_has_request_body_and_validates() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());
    defaults::register_defaults(&mut ctx.components);

    let route = classify(&manifest, "v1.posts.store");
    let op = build_operation(&mut ctx, &route).unwrap().unwrap();
    assert_eq!(op.summary.as_deref(), Some("Store one post"));
    assert_eq!(statuses(&op), vec!["201", "400", "401", "403", "422"]);
    assert!(op.parameters.is_empty());
    let body = serde_json::to_value(op.request_body.unwrap()).unwrap();
    assert_eq!(
        body["content"]["application/vnd.api+json"]["schema"]["properties"]["data"]["$ref"],
        "#/components/schemas/resources.posts.resource.store"
    );
}

#[test]
fn test_destroy_is_no_content_with_not_found() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());

    let route = classify(&manifest, "v1.posts.destroy");
    let op = build_operation(&mut ctx, &route).unwrap().unwrap();
    assert_eq!(statuses(&op), vec!["204", "400", "401", "403", "404"]);
    assert_eq!(
        op.parameters[0].ref_path(),
        Some("#/components/parameters/resources.posts.parameters.post")
    );
}

#[test]
fn test_unsupported_relationship_routes_emit_nothing() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());

    let read_only = classify(&manifest, "v1.posts.author.update");
    assert_eq!(read_only.kind, ActionKind::UpdateRelationship);
    assert!(build_operation(&mut ctx, &read_only).unwrap().is_none());

    let mut to_one_attach = classify(&manifest, "v1.posts.tags.attach");
    to_one_attach.relation = Some("author".into());
    assert!(build_operation(&mut ctx, &to_one_attach).unwrap().is_none());
}

#[test]
fn test_head_only_route_is_skipped() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());

    let route = classify(&manifest, "v1.posts.ping");
    assert!(route.method.is_none());
    assert!(build_operation(&mut ctx, &route).unwrap().is_none());
}

#[test]
fn test_custom_route_has_defaults_only() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());

    let purge = classify(&manifest, "v1.posts.purge");
    let op = build_operation(&mut ctx, &purge).unwrap().unwrap();
    assert_eq!(op.summary, None);
    assert_eq!(op.description.as_deref(), Some("Permanently removes trashed posts"));
    assert_eq!(statuses(&op), vec!["400", "401", "403"]);

    let publish = classify(&manifest, "v1.posts.publish");
    let op = build_operation(&mut ctx, &publish).unwrap().unwrap();
    assert_eq!(statuses(&op), vec!["400", "401", "403", "404"]);
}

#[test]
fn test_paths_keep_first_duplicate_and_drop_empty_items() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());
    defaults::register_defaults(&mut ctx.components);

    let routes = classify_routes(&manifest.routes, server.name(), server.base_url(), &ctx).unwrap();
    assert!(routes.iter().all(|r| !r.name.starts_with("v10.")));
    assert!(routes.iter().all(|r| !r.name.starts_with("web.")));

    let paths = build_paths(&mut ctx, &routes).unwrap();
    assert_eq!(
        paths["/posts"]
            .operation(&http::Method::GET)
            .and_then(|op| op.operation_id.as_deref()),
        Some("posts.index")
    );
    assert!(!paths.contains_key("/posts/-actions/ping"));
    assert!(paths.values().all(|item| item.has_operations()));
}

#[test]
fn test_schema_built_once_per_run() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let mut ctx = GenerationContext::new(&server, config.server("v1").unwrap());

    let index = classify(&manifest, "v1.posts.index");
    let show = classify(&manifest, "v1.posts.show");
    build_operation(&mut ctx, &index).unwrap();
    let schemas_after_index = ctx.components.components().schemas.len();
    build_operation(&mut ctx, &show).unwrap();
    assert_eq!(ctx.components.components().schemas.len(), schemas_after_index);

    let first = resource_schema(&mut ctx, "posts", ResourceContext::Fetch).unwrap();
    let second = resource_schema(&mut ctx, "posts", ResourceContext::Fetch).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.ref_path, "#/components/schemas/resources.posts.resource.fetch");
}

#[test]
fn test_generator_reports_missing_config() {
    let (manifest, _) = fixtures();
    let server = manifest.server("v1").unwrap();
    let config = GeneratorConfig::default();
    let err = OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap_err();
    assert!(matches!(err, GeneratorError::MissingServerConfig { ref key } if key == "v1"));
}

#[test]
fn test_malformed_route_aborts_generation() {
    let (mut manifest, config) = fixtures();
    manifest.routes.push(RawRoute {
        name: "v1.posts".into(),
        methods: vec!["GET".into()],
        uri: "api/v1/posts".into(),
        defaults: Default::default(),
        controller: None,
    });
    let server = manifest.server("v1").unwrap();
    let err = OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::MalformedRouteName { segments: 1, .. }
    ));
}

#[test]
fn test_generated_document_is_valid() {
    let (manifest, config) = fixtures();
    let server = manifest.server("v1").unwrap();
    let document = OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap();
    assert!(crate::validator::validate_document(&document).is_empty());
    assert_eq!(document.servers[0].url, "{serverURL}");
    assert_eq!(
        document.servers[0].variables[SERVER_URL_VARIABLE].default,
        "http://localhost/api/v1"
    );
    assert_eq!(document.extensions["tagGroups"][0]["name"], "Content");
    assert_eq!(document.info.title, "Blog API");
}

#[test]
fn test_every_uri_placeholder_is_a_path_parameter() {
    let (mut manifest, config) = fixtures();
    manifest.routes.push(RawRoute {
        name: "v1.posts.approve".into(),
        methods: vec!["POST".into()],
        uri: "api/v1/posts/{post}/comments/{comment}/-actions/approve".into(),
        defaults: Default::default(),
        controller: None,
    });
    let server = manifest.server("v1").unwrap();
    let document = OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap();

    let item = &document.paths.as_ref().unwrap()["/posts/{post}/comments/{comment}/-actions/approve"];
    let op = item.operation(&http::Method::POST).unwrap();
    assert_eq!(op.parameters.len(), 2);
    assert_eq!(
        op.parameters[0].ref_path(),
        Some("#/components/parameters/resources.posts.parameters.post")
    );
    let comment = op.parameters[1].object().unwrap();
    assert_eq!(comment.name, "comment");
    assert_eq!(comment.location, ParameterIn::Path);
    assert_eq!(comment.required, Some(true));
    assert_eq!(statuses(op), vec!["400", "401", "403", "404"]);
}
