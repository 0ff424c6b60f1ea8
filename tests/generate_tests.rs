#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::collections::{BTreeMap, HashSet};

use jsonapi_openapi::spec::{
    load_document, write_document, OutputFormat, PathItem, PathItemExt, OPENAPI_VERSION,
};
use jsonapi_openapi::validator::validate_document;
use jsonapi_openapi::{Document, GeneratorError, OpenApiGenerator};
use serde_json::{json, Value};

use common::{blog_document, blog_json, config, manifest};

const JSONAPI: &str = "application/vnd.api+json";

fn paths(doc: &Document) -> &BTreeMap<String, PathItem> {
    doc.paths.as_ref().expect("document has paths")
}

fn methods(doc: &Document, uri: &str) -> HashSet<String> {
    paths(doc)
        .get(uri)
        .unwrap_or_else(|| panic!("missing path {uri}"))
        .methods()
        .into_iter()
        .map(|(method, _)| method.as_str().to_lowercase())
        .collect()
}

fn set(methods: &[&str]) -> HashSet<String> {
    methods.iter().map(|m| m.to_string()).collect()
}

fn response_schema<'a>(doc: &'a Value, uri: &str, method: &str, status: &str) -> &'a Value {
    &doc["paths"][uri][method]["responses"][status]["content"][JSONAPI]["schema"]
}

fn component<'a>(doc: &'a Value, reference: &Value) -> &'a Value {
    let id = reference
        .as_str()
        .and_then(|r| r.strip_prefix("#/components/schemas/"))
        .unwrap();
    &doc["components"]["schemas"][id]
}

#[test]
fn test_resource_paths_and_read_only_relationship() {
    let doc = blog_document();
    assert_eq!(doc.openapi, OPENAPI_VERSION);
    assert_eq!(methods(&doc, "/posts"), set(&["get", "post"]));
    assert_eq!(methods(&doc, "/posts/{post}"), set(&["get", "patch", "delete"]));
    assert_eq!(methods(&doc, "/posts/{post}/relationships/author"), set(&["get"]));
    assert_eq!(
        methods(&doc, "/posts/{post}/relationships/tags"),
        set(&["get", "patch", "post", "delete"])
    );
}

#[test]
fn test_id_membership_filter() {
    let doc = blog_json();
    let params = doc["paths"]["/posts"]["get"]["parameters"].as_array().unwrap();
    let filter = params.iter().find(|p| p["name"] == "filter[id]").unwrap();
    assert_eq!(filter["in"], "query");
    assert_eq!(filter["schema"]["type"], "array");
    assert_eq!(filter["schema"]["items"]["type"], "string");
    assert_eq!(filter["style"], "form");
    assert_eq!(filter["explode"], false);
    let examples = filter["examples"].as_object().unwrap();
    assert_eq!(examples["empty"]["value"], json!([]));
    assert_eq!(examples["1"]["value"], json!(["1"]));
    assert_eq!(examples.len(), 4);
}

#[test]
fn test_fetch_schema_is_shared_between_index_and_show() {
    let doc = blog_json();
    let index = response_schema(&doc, "/posts", "get", "200");
    let show = response_schema(&doc, "/posts/{post}", "get", "200");
    let fetch = "#/components/schemas/resources.posts.resource.fetch";
    assert_eq!(index["properties"]["data"]["items"]["$ref"], fetch);
    assert_eq!(show["properties"]["data"]["$ref"], fetch);
    let schemas = doc["components"]["schemas"].as_object().unwrap();
    assert_eq!(
        schemas
            .keys()
            .filter(|k| k.as_str() == "resources.posts.resource.fetch")
            .count(),
        1
    );
}

#[test]
fn test_two_segment_relationship_route_is_fetch_related() {
    let doc = blog_json();
    let op = &doc["paths"]["/posts/{post}/author"]["get"];
    assert_eq!(op["operationId"], "posts.author.showRelated");
    assert_eq!(op["summary"], "Show related author");
    let data = &response_schema(&doc, "/posts/{post}/author", "get", "200")["properties"]["data"];
    assert_eq!(data["$ref"], "#/components/schemas/resources.users.resource.fetch");
}

#[test]
fn test_no_head_operations() {
    let doc = blog_document();
    for (uri, item) in paths(&doc) {
        assert!(item.head.is_none(), "HEAD emitted for {uri}");
        assert!(item.has_operations());
    }
    assert!(!paths(&doc).contains_key("/posts/-actions/ping"));
}

#[test]
fn test_conditional_error_responses() {
    let doc = blog_document();
    let validating = ["store", "update", "attach", "detach"];
    for (uri, item) in paths(&doc) {
        let has_id = uri.contains('{');
        for (method, op) in item.methods() {
            let operation_id = op.operation_id.as_deref().unwrap();
            let responses = op.responses.as_ref().unwrap();
            let action = operation_id.rsplit('.').next().unwrap();
            let relationship_update = operation_id.split('.').count() == 3 && action == "update";
            assert_eq!(responses.contains_key("404"), has_id, "404 on {method} {uri}");
            assert_eq!(
                responses.contains_key("422"),
                validating.contains(&action) || relationship_update,
                "422 on {method} {uri}"
            );
            for status in ["400", "401", "403"] {
                assert!(responses.contains_key(status));
            }
        }
    }
}

#[test]
fn test_to_many_relationships_are_wrapped() {
    let doc = blog_json();
    let tags = response_schema(&doc, "/posts/{post}/relationships/tags", "get", "200");
    assert_eq!(tags["properties"]["data"]["type"], "array");
    assert_eq!(
        tags["properties"]["data"]["items"]["$ref"],
        "#/components/schemas/resources.posts.relationship.tags.fetch"
    );
    assert!(tags["properties"]["links"].is_object());

    let author = response_schema(&doc, "/posts/{post}/relationships/author", "get", "200");
    assert_eq!(
        author["properties"]["data"]["$ref"],
        "#/components/schemas/resources.posts.relationship.author.fetch"
    );

    let attach = &doc["components"]["schemas"]["resources.posts.relationship.tags.attach"];
    assert_eq!(attach["properties"]["data"]["type"], "array");
    assert_eq!(attach["required"], json!(["data"]));

    let fetch = &doc["components"]["schemas"]["resources.posts.resource.fetch"];
    let relationships = &fetch["properties"]["relationships"]["properties"];
    assert_eq!(relationships["comments"]["properties"]["data"]["type"], "array");
    assert!(relationships["author"]["properties"]["data"]["$ref"].is_string());
    assert_eq!(relationships["author"]["readOnly"], true);
}

#[test]
fn test_polymorphic_related_fans_out() {
    let doc = blog_json();
    let data = &response_schema(&doc, "/posts/{post}/media", "get", "200")["properties"]["data"];
    assert_eq!(data["type"], "array");
    let union = component(&doc, &data["items"]["$ref"]);
    let variants: Vec<&str> = union["oneOf"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["$ref"].as_str().unwrap())
        .collect();
    assert_eq!(
        variants,
        vec![
            "#/components/schemas/resources.images.resource.fetch",
            "#/components/schemas/resources.videos.resource.fetch",
        ]
    );

    let linkage = &doc["components"]["schemas"]["resources.posts.relationship.media.fetch"];
    let shapes = linkage["oneOf"].as_array().unwrap();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0]["properties"]["type"]["enum"], json!(["images"]));
    assert_eq!(shapes[1]["properties"]["type"]["enum"], json!(["videos"]));
}

#[test]
fn test_paths_are_unique_and_sorted() {
    let doc = blog_document();
    let uris: Vec<&String> = paths(&doc).keys().collect();
    assert!(uris.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(uris.iter().any(|uri| *uri == "/posts"));
    assert!(uris.iter().any(|uri| *uri == "/posts/-actions/purge"));
    assert!(!uris.iter().any(|uri| uri.starts_with("/api")));
}

#[test]
fn test_other_servers_routes_are_excluded() {
    let doc = blog_document();
    assert!(!paths(&doc).contains_key("/"));
    let ids: Vec<&str> = paths(&doc)
        .values()
        .flat_map(|item| item.methods())
        .filter_map(|(_, op)| op.operation_id.as_deref())
        .collect();
    assert!(!ids.contains(&"posts.list"));
    assert!(ids.contains(&"users.index"));
}

#[test]
fn test_sample_values_become_examples() {
    let doc = blog_json();
    let fetch = &doc["components"]["schemas"]["resources.posts.resource.fetch"];
    assert_eq!(fetch["properties"]["id"]["example"], "1");
    assert_eq!(fetch["properties"]["type"]["default"], "posts");
    let attributes = &fetch["properties"]["attributes"]["properties"];
    assert_eq!(attributes["title"]["example"], "Hello");
    assert_eq!(attributes["views"]["readOnly"], true);

    // no records for videos
    let videos = &doc["components"]["schemas"]["resources.videos.resource.fetch"];
    assert!(videos["properties"]["id"].get("example").is_none());

    let store = &doc["components"]["schemas"]["resources.posts.resource.store"];
    assert!(store["properties"].get("id").is_none());
}

#[test]
fn test_document_metadata_from_config() {
    let doc = blog_json();
    assert_eq!(doc["info"]["title"], "Blog API");
    assert_eq!(doc["info"]["version"], "1.0.0");
    assert_eq!(doc["servers"][0]["url"], "{serverURL}");
    assert_eq!(
        doc["servers"][0]["variables"]["serverURL"]["default"],
        "http://localhost/api/v1"
    );
    assert_eq!(doc["x-tagGroups"][0]["tags"], json!(["Posts", "Users"]));
    for id in ["pageSize", "pageNumber", "pageLimit", "pageOffset", "sort"] {
        assert!(doc["components"]["parameters"][id].is_object(), "{id}");
    }
    for id in [
        "bad_request",
        "unauthorized",
        "forbidden",
        "not_found",
        "unprocessable_entity",
    ] {
        assert!(doc["components"]["responses"][id].is_object(), "{id}");
    }
}

#[test]
fn test_written_document_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let doc = blog_document();
    for format in [OutputFormat::Yaml, OutputFormat::Json] {
        let path = write_document(&doc, "v1", format, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("v1_openapi.{}", format.extension())
        );
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, doc);
        assert!(validate_document(&loaded).is_empty());
    }
}

#[test]
fn test_unknown_relationship_aborts() {
    let mut manifest = manifest();
    let config = config();
    let route = manifest
        .routes
        .iter_mut()
        .find(|r| r.name == "v1.posts.tags.show")
        .unwrap();
    route.name = "v1.posts.labels.show".into();
    let server = manifest.server("v1").unwrap();
    let err = OpenApiGenerator::new("v1", &manifest, &server, &config)
        .generate()
        .unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::UnknownRelationship { ref relation, .. } if relation == "labels"
    ));
}

#[test]
fn test_unknown_server_key() {
    let manifest = manifest();
    assert!(matches!(
        manifest.server("v2"),
        Err(GeneratorError::UnknownServer { .. })
    ));
}
