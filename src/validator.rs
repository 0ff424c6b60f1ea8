//! Structural checks run on every generated document before it is written.
//!
//! All issues are collected in one pass so a failed run reports everything
//! at once.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::Value;

use crate::route::template_parameters;
use crate::spec::{
    Document, ObjectOrReference, ObjectOrReferenceExt, Operation, Parameter, ParameterIn,
    OPENAPI_VERSION,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Print issues to stderr grouped by location.
pub fn print_issues(issues: &[ValidationIssue]) {
    eprintln!(
        "\n❌ OpenAPI document validation failed. {} issue(s) found:\n",
        issues.len()
    );
    let mut grouped: IndexMap<&str, Vec<&ValidationIssue>> = IndexMap::new();
    for issue in issues {
        grouped.entry(issue.location.as_str()).or_default().push(issue);
    }
    for (location, issues) in grouped {
        eprintln!("{}", location);
        for issue in issues {
            eprintln!("  [{}] {}", issue.kind, issue.message);
        }
    }
    eprintln!("\nThe document was not written.\n");
}

/// Validate a generated document. An empty result means it is valid.
pub fn validate_document(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if document.openapi != OPENAPI_VERSION {
        issues.push(ValidationIssue::new(
            "openapi",
            "Version",
            format!("Expected {}, found {}", OPENAPI_VERSION, document.openapi),
        ));
    }
    if document.info.title.trim().is_empty() {
        issues.push(ValidationIssue::new("info.title", "MissingField", "Title is empty"));
    }
    if document.info.version.trim().is_empty() {
        issues.push(ValidationIssue::new(
            "info.version",
            "MissingField",
            "Version is empty",
        ));
    }

    check_operations(document, &mut issues);
    check_parameter_examples(document, &mut issues);

    match serde_json::to_value(document) {
        Ok(value) => {
            check_references(&value, &value, "#", &mut issues);
            check_array_items(&value, "#", &mut issues);
            if let Err(e) = serde_json::from_value::<oas3::OpenApiV3Spec>(value) {
                issues.push(ValidationIssue::new("#", "Structure", e.to_string()));
            }
        }
        Err(e) => issues.push(ValidationIssue::new("#", "Serialization", e.to_string())),
    }

    issues
}

/// Every operation of the document with its `paths.{uri}.{method}` location.
fn operations(document: &Document) -> impl Iterator<Item = (String, &str, &Operation)> {
    document
        .paths
        .iter()
        .flatten()
        .flat_map(|(uri, item)| {
            item.methods().into_iter().map(move |(method, operation)| {
                let location = format!("paths.{}.{}", uri, method.as_str().to_lowercase());
                (location, uri.as_str(), operation)
            })
        })
}

fn check_operations(document: &Document, issues: &mut Vec<ValidationIssue>) {
    let mut operation_ids: HashMap<&str, String> = HashMap::new();
    for (location, uri, operation) in operations(document) {
        match operation.operation_id.as_deref() {
            Some(operation_id) => {
                if let Some(previous) = operation_ids.insert(operation_id, location.clone()) {
                    issues.push(ValidationIssue::new(
                        &location,
                        "DuplicateOperationId",
                        format!("operationId {} is also used by {}", operation_id, previous),
                    ));
                }
            }
            None => issues.push(ValidationIssue::new(
                &location,
                "MissingField",
                "Operation has no operationId",
            )),
        }

        if operation.responses.as_ref().map_or(true, BTreeMap::is_empty) {
            issues.push(ValidationIssue::new(
                &location,
                "MissingResponses",
                "Operation declares no responses",
            ));
        }

        let declared = path_parameters(document, operation);
        for name in template_parameters(uri) {
            match declared.get(name.as_str()) {
                Some(true) => {}
                Some(false) => issues.push(ValidationIssue::new(
                    &location,
                    "PathParameter",
                    format!("Path parameter {} must be required", name),
                )),
                None => issues.push(ValidationIssue::new(
                    &location,
                    "PathParameter",
                    format!("Path parameter {} is not declared", name),
                )),
            }
        }
    }
}

/// Declared path parameters of an operation, name → required.
fn path_parameters<'d>(document: &'d Document, operation: &'d Operation) -> BTreeMap<&'d str, bool> {
    operation
        .parameters
        .iter()
        .filter_map(|p| resolve_parameter(document, p))
        .filter(|p| p.location == ParameterIn::Path)
        .map(|p| (p.name.as_str(), p.required.unwrap_or(false)))
        .collect()
}

fn resolve_parameter<'d>(
    document: &'d Document,
    parameter: &'d ObjectOrReference<Parameter>,
) -> Option<&'d Parameter> {
    match parameter {
        ObjectOrReference::Object(parameter) => Some(parameter),
        ObjectOrReference::Ref { ref_path, .. } => {
            let id = ref_path.strip_prefix("#/components/parameters/")?;
            document.components.as_ref()?.parameters.get(id)?.object()
        }
    }
}

fn check_parameter_examples(document: &Document, issues: &mut Vec<ValidationIssue>) {
    let shared = document
        .components
        .iter()
        .flat_map(|c| c.parameters.iter())
        .filter_map(|(id, p)| {
            p.object()
                .map(|p| (format!("components.parameters.{}", id), p))
        });
    let inline = operations(document).flat_map(|(location, _, operation)| {
        operation.parameters.iter().filter_map(move |p| {
            p.object()
                .map(|p| (format!("{}.parameters.{}", location, p.name), p))
        })
    });

    for (location, parameter) in shared.chain(inline) {
        if parameter.examples.is_empty() {
            continue;
        }
        let schema = match parameter.schema.as_ref().map(|s| s.resolve(document)) {
            Some(Ok(schema)) => schema,
            Some(Err(e)) => {
                issues.push(ValidationIssue::new(&location, "UnresolvedReference", e.to_string()));
                continue;
            }
            None => {
                issues.push(ValidationIssue::new(
                    &location,
                    "MissingField",
                    "Parameter with examples has no schema",
                ));
                continue;
            }
        };
        let schema = match serde_json::to_value(&schema) {
            Ok(schema) => schema,
            Err(e) => {
                issues.push(ValidationIssue::new(&location, "Serialization", e.to_string()));
                continue;
            }
        };
        let validator = match jsonschema::validator_for(&schema) {
            Ok(validator) => validator,
            Err(e) => {
                issues.push(ValidationIssue::new(&location, "InvalidSchema", e.to_string()));
                continue;
            }
        };
        for (key, example) in &parameter.examples {
            let Some(value) = example.object().and_then(|e| e.value.as_ref()) else {
                continue;
            };
            for error in validator.iter_errors(value) {
                issues.push(ValidationIssue::new(
                    &location,
                    "InvalidExample",
                    format!("Example {}: {}", key, error),
                ));
            }
        }
    }
}

/// Every `$ref` must point at an existing entry of its components bucket.
fn check_references(root: &Value, value: &Value, pointer: &str, issues: &mut Vec<ValidationIssue>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                if !reference_resolves(root, target) {
                    issues.push(ValidationIssue::new(
                        pointer,
                        "UnresolvedReference",
                        format!("{} does not resolve", target),
                    ));
                }
            }
            for (key, child) in map {
                if is_example_key(key) {
                    continue;
                }
                check_references(root, child, &format!("{}/{}", pointer, key), issues);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                check_references(root, child, &format!("{}/{}", pointer, i), issues);
            }
        }
        _ => {}
    }
}

fn reference_resolves(root: &Value, target: &str) -> bool {
    let Some(rest) = target.strip_prefix("#/components/") else {
        return false;
    };
    let Some((bucket, id)) = rest.split_once('/') else {
        return false;
    };
    root.get("components")
        .and_then(|c| c.get(bucket))
        .and_then(|b| b.get(id))
        .is_some()
}

/// Array schemas must declare `items`.
fn check_array_items(value: &Value, pointer: &str, issues: &mut Vec<ValidationIssue>) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("array") && !map.contains_key("items")
            {
                issues.push(ValidationIssue::new(
                    pointer,
                    "MissingItems",
                    "Array schema has no items",
                ));
            }
            for (key, child) in map {
                if is_example_key(key) {
                    continue;
                }
                check_array_items(child, &format!("{}/{}", pointer, key), issues);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                check_array_items(child, &format!("{}/{}", pointer, i), issues);
            }
        }
        _ => {}
    }
}

/// Example payloads are data, not schema.
fn is_example_key(key: &str) -> bool {
    matches!(key, "example" | "examples" | "default" | "enum")
}
