//! # Route Classifier
//!
//! Turns raw routes into [`RouteDescriptor`]s: which resource, which
//! relation (if any), which [`ActionKind`], which HTTP method and which
//! server-relative URI.
//!
//! ## Route names
//!
//! Route names are dotted. Everything up to and including the server's name
//! segment is dropped and the remainder is split:
//!
//! | Remainder | Meaning |
//! |-----------|---------|
//! | `posts.index` | resource + action |
//! | `posts.author` | resource + relation name ⇒ fetch related |
//! | `posts.tags.attach` | resource + relation + relationship action |
//!
//! Any other segment count is a configuration error.

use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GeneratorError, Result};
use crate::source::{ControllerBehavior, RawRoute, SchemaRegistry};

/// Action token used for reclassified related-resource routes.
pub const SHOW_RELATED: &str = "showRelated";

static TEMPLATE_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}/]+)\}").expect("URI template parameter regex should be valid")
});

/// What an endpoint does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Index,
    Show,
    Store,
    Update,
    Destroy,
    FetchRelated,
    AttachRelationship,
    DetachRelationship,
    FetchRelationship,
    UpdateRelationship,
    Custom,
}

impl ActionKind {
    /// Classify an action token given whether a relation segment was present.
    pub fn from_token(action: &str, has_relation: bool) -> Self {
        match (action, has_relation) {
            ("index", false) => ActionKind::Index,
            ("show", false) => ActionKind::Show,
            ("store", false) => ActionKind::Store,
            ("update", false) => ActionKind::Update,
            ("destroy", false) => ActionKind::Destroy,
            (SHOW_RELATED, _) | ("related", true) => ActionKind::FetchRelated,
            ("show", true) => ActionKind::FetchRelationship,
            ("update", true) => ActionKind::UpdateRelationship,
            ("attach", true) => ActionKind::AttachRelationship,
            ("detach", true) => ActionKind::DetachRelationship,
            _ => ActionKind::Custom,
        }
    }

    /// Whether this action operates on a relation of the resource.
    pub fn targets_relation(&self) -> bool {
        matches!(
            self,
            ActionKind::FetchRelated
                | ActionKind::AttachRelationship
                | ActionKind::DetachRelationship
                | ActionKind::FetchRelationship
                | ActionKind::UpdateRelationship
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Index => "index",
            ActionKind::Show => "show",
            ActionKind::Store => "store",
            ActionKind::Update => "update",
            ActionKind::Destroy => "destroy",
            ActionKind::FetchRelated => "fetch-related",
            ActionKind::AttachRelationship => "attach-relationship",
            ActionKind::DetachRelationship => "detach-relationship",
            ActionKind::FetchRelationship => "fetch-relationship",
            ActionKind::UpdateRelationship => "update-relationship",
            ActionKind::Custom => "custom",
        }
    }
}

impl From<ControllerBehavior> for ActionKind {
    fn from(behavior: ControllerBehavior) -> Self {
        match behavior {
            ControllerBehavior::FetchMany => ActionKind::Index,
            ControllerBehavior::FetchOne => ActionKind::Show,
            ControllerBehavior::Store => ActionKind::Store,
            ControllerBehavior::Update => ActionKind::Update,
            ControllerBehavior::Destroy => ActionKind::Destroy,
            ControllerBehavior::FetchRelated => ActionKind::FetchRelated,
            ControllerBehavior::FetchRelationship => ActionKind::FetchRelationship,
            ControllerBehavior::UpdateRelationship => ActionKind::UpdateRelationship,
            ControllerBehavior::AttachRelationship => ActionKind::AttachRelationship,
            ControllerBehavior::DetachRelationship => ActionKind::DetachRelationship,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified route. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Full dotted route name
    pub name: String,
    pub resource: String,
    pub relation: Option<String>,
    /// Trailing action token (`showRelated` for reclassified routes)
    pub action: String,
    pub kind: ActionKind,
    /// First non-`HEAD` method; `None` when the route only answers `HEAD`
    pub method: Option<Method>,
    /// Server-relative URI template, always starting with `/`
    pub uri: String,
    /// Path parameter carrying the resource id
    pub path_parameter: Option<String>,
}

impl RouteDescriptor {
    /// Classify `route` for the server named `server_name`.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::MalformedRouteName`] when the name doesn't split
    ///   into two or three segments after the server segment
    /// - [`GeneratorError::UnknownResource`] when the resource type isn't registered
    /// - [`GeneratorError::InvalidMethod`] for unparsable methods
    pub fn classify(
        route: &RawRoute,
        server_name: &str,
        base_path: &str,
        schemas: &SchemaRegistry,
    ) -> Result<Self> {
        let segments = segments_after_server(&route.name, server_name);
        let (resource, mut relation, mut action) = match segments.as_slice() {
            [resource, action] => (resource.to_string(), None, action.to_string()),
            [resource, relation, action] => (
                resource.to_string(),
                Some(relation.to_string()),
                action.to_string(),
            ),
            other => {
                return Err(GeneratorError::MalformedRouteName {
                    name: route.name.clone(),
                    segments: other.len(),
                })
            }
        };

        let schema = schemas.schema_for(&resource)?;
        if relation.is_none() && schema.is_relationship(&action) {
            relation = Some(std::mem::replace(&mut action, SHOW_RELATED.to_string()));
        }

        let mut kind = ActionKind::from_token(&action, relation.is_some());
        if let Some(behavior) = route.controller.as_ref().and_then(|c| c.behavior) {
            let declared = ActionKind::from(behavior);
            if declared.targets_relation() == relation.is_some() {
                kind = declared;
            } else {
                warn!(
                    route = %route.name,
                    behavior = ?behavior,
                    "Controller behaviour doesn't fit the route shape, using the route name"
                );
            }
        }

        let method = first_non_head_method(route)?;
        let uri = relative_uri(&route.uri, base_path);
        let path_parameter = route
            .resource_id_name()
            .map(str::to_string)
            .or_else(|| template_parameters(&uri).into_iter().next());
        let descriptor = RouteDescriptor {
            name: route.name.clone(),
            resource,
            relation,
            action,
            kind,
            method,
            uri,
            path_parameter,
        };
        debug!(
            route = %descriptor.name,
            kind = %descriptor.kind,
            uri = %descriptor.uri,
            "Classified route"
        );
        Ok(descriptor)
    }

    /// `{resource}[.{relation}].{action}`
    pub fn operation_id(&self) -> String {
        match &self.relation {
            Some(relation) => format!("{}.{}.{}", self.resource, relation, self.action),
            None => format!("{}.{}", self.resource, self.action),
        }
    }

    pub fn has_path_parameter(&self) -> bool {
        self.path_parameter.is_some()
    }
}

/// Names of the `{placeholders}` in a URI template, in order.
pub fn template_parameters(uri: &str) -> Vec<String> {
    TEMPLATE_PARAM
        .captures_iter(uri)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether a route belongs to the server: some dotted segment equals the name.
pub fn belongs_to(route_name: &str, server_name: &str) -> bool {
    route_name.split('.').any(|segment| segment == server_name)
}

fn segments_after_server<'a>(route_name: &'a str, server_name: &str) -> Vec<&'a str> {
    let segments: Vec<&str> = route_name.split('.').collect();
    match segments.iter().position(|s| *s == server_name) {
        Some(index) => segments[index + 1..].to_vec(),
        None => segments,
    }
}

fn first_non_head_method(route: &RawRoute) -> Result<Option<Method>> {
    for raw in &route.methods {
        let method = Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
            GeneratorError::InvalidMethod {
                route: route.name.clone(),
                method: raw.clone(),
            }
        })?;
        if method != Method::HEAD {
            return Ok(Some(method));
        }
    }
    Ok(None)
}

/// Path component of a server URL without the trailing `/`.
///
/// Relative inputs are parsed against a dummy host so `/api/v1` and
/// `http://localhost/api/v1` yield the same base path.
pub fn base_path(server_url: &str) -> String {
    Url::parse(server_url)
        .or_else(|_| Url::parse(&format!("http://dummy/{}", server_url.trim_start_matches('/'))))
        .map(|u| u.path().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

/// Route URI relative to the server base path, with a leading `/`.
pub fn relative_uri(uri: &str, base_path: &str) -> String {
    let absolute = format!("/{}", uri.trim_start_matches('/'));
    if base_path.is_empty() {
        return absolute;
    }
    match absolute.strip_prefix(base_path) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => absolute,
    }
}
