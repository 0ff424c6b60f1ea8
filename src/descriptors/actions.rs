//! Action descriptors
//!
//! One descriptor per [`ActionKind`]. Each knows the parameters, request
//! body and success responses of its operation; the shared operation shell
//! (operation id, summary, tags, default error responses) is assembled in
//! [`crate::generator::operation`].
//!
//! Resolution walks [`DESCRIPTORS`] in order and takes the first descriptor
//! whose [`ActionDescriptor::describes`] accepts the route. [`Custom`] is last
//! and accepts everything.

use crate::error::{GeneratorError, Result};
use crate::generator::responses::{self, StatusResponse};
use crate::generator::{parameters, GenerationContext};
use crate::inflect::singular;
use crate::route::{ActionKind, RouteDescriptor};
use crate::source::Relation;
use crate::spec::{IntoRef, ObjectOrReference, ObjectSchema, Parameter, RequestBody, RequestBodyExt};

use super::filters::filter_parameters;
use super::schema::{
    related_schema, relationship_links, relationship_request, required_relationship_data,
    resource_schema, RelationshipRequest, ResourceContext,
};

pub trait ActionDescriptor: Sync {
    fn kind(&self) -> ActionKind;

    /// Whether this descriptor handles `route`.
    fn describes(&self, route: &RouteDescriptor) -> bool {
        route.kind == self.kind() && route.relation.is_some() == self.kind().targets_relation()
    }

    /// Whether an operation can be emitted for this route at all.
    fn supports(&self, _ctx: &GenerationContext<'_>, _route: &RouteDescriptor) -> Result<bool> {
        Ok(true)
    }

    /// Summary used when configuration doesn't override it.
    fn summary(&self, route: &RouteDescriptor) -> Option<String>;

    /// Whether the action validates input and can answer 422.
    fn validates(&self) -> bool {
        false
    }

    fn parameters(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<ObjectOrReference<Parameter>>> {
        parameters::path_parameters(ctx, route)
    }

    fn request_body(
        &self,
        _ctx: &mut GenerationContext<'_>,
        _route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        Ok(None)
    }

    /// Success responses.
    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>>;
}

/// Registered descriptors in resolution order.
pub static DESCRIPTORS: &[&dyn ActionDescriptor] = &[
    &Index,
    &Show,
    &Store,
    &Update,
    &Destroy,
    &FetchRelated,
    &FetchRelationship,
    &UpdateRelationship,
    &AttachRelationship,
    &DetachRelationship,
    &Custom,
];

/// First registered descriptor that describes `route`.
pub fn resolve(route: &RouteDescriptor) -> &'static dyn ActionDescriptor {
    DESCRIPTORS
        .iter()
        .copied()
        .find(|d| d.describes(route))
        .unwrap_or(&Custom)
}

fn singular_resource(route: &RouteDescriptor) -> String {
    singular(&route.resource)
}

fn relation_name(route: &RouteDescriptor) -> &str {
    route.relation.as_deref().unwrap_or_default()
}

/// The relation a relationship route targets.
fn relation<'a>(ctx: &GenerationContext<'a>, route: &RouteDescriptor) -> Result<Relation<'a>> {
    let name = relation_name(route);
    ctx.schemas()
        .schema_for(&route.resource)?
        .relationship(name)
        .ok_or_else(|| GeneratorError::UnknownRelationship {
            resource: route.resource.clone(),
            relation: name.to_string(),
        })
}

pub struct Index;

impl ActionDescriptor for Index {
    fn kind(&self) -> ActionKind {
        ActionKind::Index
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Get all {}", route.resource))
    }

    fn parameters(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<ObjectOrReference<Parameter>>> {
        let schema = ctx.schemas().schema_for(&route.resource)?;
        let mut params = parameters::path_parameters(ctx, route)?;
        params.extend(parameters::pagination_parameters(schema.pagination));
        params.extend(parameters::sort_parameter(&schema.sortable).map(IntoRef::into_ref));
        params.extend(
            filter_parameters(ctx, &route.resource)?
                .into_iter()
                .map(IntoRef::into_ref),
        );
        Ok(params)
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let fetch = resource_schema(ctx, &route.resource, ResourceContext::Fetch)?;
        Ok(vec![responses::success(
            200,
            format!("Index {}", route.resource),
            responses::document(responses::data(fetch, true), None),
        )])
    }
}

pub struct Show;

impl ActionDescriptor for Show {
    fn kind(&self) -> ActionKind {
        ActionKind::Show
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Show one {}", singular_resource(route)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let fetch = resource_schema(ctx, &route.resource, ResourceContext::Fetch)?;
        Ok(vec![responses::success(
            200,
            format!("Show {}", route.resource),
            responses::document(responses::data(fetch, false), None),
        )])
    }
}

pub struct Store;

impl ActionDescriptor for Store {
    fn kind(&self) -> ActionKind {
        ActionKind::Store
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Store one {}", singular_resource(route)))
    }

    fn validates(&self) -> bool {
        true
    }

    fn request_body(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        let store = resource_schema(ctx, &route.resource, ResourceContext::Store)?;
        Ok(Some(responses::resource_request(store)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let fetch = resource_schema(ctx, &route.resource, ResourceContext::Fetch)?;
        Ok(vec![responses::success(
            201,
            format!("Store {}", route.resource),
            responses::document(responses::data(fetch, false), None),
        )])
    }
}

pub struct Update;

impl ActionDescriptor for Update {
    fn kind(&self) -> ActionKind {
        ActionKind::Update
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Update one {}", singular_resource(route)))
    }

    fn validates(&self) -> bool {
        true
    }

    fn request_body(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        let update = resource_schema(ctx, &route.resource, ResourceContext::Update)?;
        Ok(Some(responses::resource_request(update)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let fetch = resource_schema(ctx, &route.resource, ResourceContext::Fetch)?;
        Ok(vec![responses::success(
            200,
            format!("Update {}", route.resource),
            responses::document(responses::data(fetch, false), None),
        )])
    }
}

pub struct Destroy;

impl ActionDescriptor for Destroy {
    fn kind(&self) -> ActionKind {
        ActionKind::Destroy
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Destroy one {}", singular_resource(route)))
    }

    fn responses(
        &self,
        _ctx: &mut GenerationContext<'_>,
        _route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        Ok(vec![responses::no_content()])
    }
}

pub struct FetchRelated;

impl ActionDescriptor for FetchRelated {
    fn kind(&self) -> ActionKind {
        ActionKind::FetchRelated
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Show related {}", relation_name(route)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let relation = relation(ctx, route)?;
        let related = related_schema(ctx, &route.resource, relation)?;
        Ok(vec![responses::success(
            200,
            format!("Show related {}", relation.name),
            responses::document(responses::data(related, relation.is_to_many()), None),
        )])
    }
}

fn relationship_document(
    ctx: &mut GenerationContext<'_>,
    route: &RouteDescriptor,
    relation: Relation<'_>,
) -> Result<ObjectSchema> {
    let data = required_relationship_data(ctx, &route.resource, relation)?;
    let links = relationship_links(ctx, &route.resource, relation.name);
    Ok(responses::document(data, Some(links)))
}

pub struct FetchRelationship;

impl ActionDescriptor for FetchRelationship {
    fn kind(&self) -> ActionKind {
        ActionKind::FetchRelationship
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Show {} relation", relation_name(route)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let relation = relation(ctx, route)?;
        let body = relationship_document(ctx, route, relation)?;
        Ok(vec![responses::success(
            200,
            format!("Show {} relation", relation.name),
            body,
        )])
    }
}

pub struct UpdateRelationship;

impl ActionDescriptor for UpdateRelationship {
    fn kind(&self) -> ActionKind {
        ActionKind::UpdateRelationship
    }

    fn supports(&self, ctx: &GenerationContext<'_>, route: &RouteDescriptor) -> Result<bool> {
        Ok(!relation(ctx, route)?.read_only)
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Update {} relation", relation_name(route)))
    }

    fn validates(&self) -> bool {
        true
    }

    fn request_body(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        let relation = relation(ctx, route)?;
        let request =
            relationship_request(ctx, &route.resource, relation, RelationshipRequest::Update)?;
        Ok(Some(RequestBody::jsonapi(request)))
    }

    fn responses(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        let relation = relation(ctx, route)?;
        let body = relationship_document(ctx, route, relation)?;
        Ok(vec![responses::success(
            200,
            format!("Update {} relation", relation.name),
            body,
        )])
    }
}

/// Attach and detach only apply to writable to-many relations.
fn supports_membership(ctx: &GenerationContext<'_>, route: &RouteDescriptor) -> Result<bool> {
    let relation = relation(ctx, route)?;
    Ok(!relation.read_only && relation.is_to_many())
}

pub struct AttachRelationship;

impl ActionDescriptor for AttachRelationship {
    fn kind(&self) -> ActionKind {
        ActionKind::AttachRelationship
    }

    fn supports(&self, ctx: &GenerationContext<'_>, route: &RouteDescriptor) -> Result<bool> {
        supports_membership(ctx, route)
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Attach {}", relation_name(route)))
    }

    fn validates(&self) -> bool {
        true
    }

    fn request_body(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        let relation = relation(ctx, route)?;
        let request =
            relationship_request(ctx, &route.resource, relation, RelationshipRequest::Attach)?;
        Ok(Some(RequestBody::jsonapi(request)))
    }

    fn responses(
        &self,
        _ctx: &mut GenerationContext<'_>,
        _route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        Ok(vec![responses::no_content()])
    }
}

pub struct DetachRelationship;

impl ActionDescriptor for DetachRelationship {
    fn kind(&self) -> ActionKind {
        ActionKind::DetachRelationship
    }

    fn supports(&self, ctx: &GenerationContext<'_>, route: &RouteDescriptor) -> Result<bool> {
        supports_membership(ctx, route)
    }

    fn summary(&self, route: &RouteDescriptor) -> Option<String> {
        Some(format!("Detach {}", relation_name(route)))
    }

    fn validates(&self) -> bool {
        true
    }

    fn request_body(
        &self,
        ctx: &mut GenerationContext<'_>,
        route: &RouteDescriptor,
    ) -> Result<Option<RequestBody>> {
        let relation = relation(ctx, route)?;
        let request =
            relationship_request(ctx, &route.resource, relation, RelationshipRequest::Detach)?;
        Ok(Some(RequestBody::jsonapi(request)))
    }

    fn responses(
        &self,
        _ctx: &mut GenerationContext<'_>,
        _route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        Ok(vec![responses::no_content()])
    }
}

/// Fallback for bespoke endpoints: path parameters and default error responses only.
pub struct Custom;

impl ActionDescriptor for Custom {
    fn kind(&self) -> ActionKind {
        ActionKind::Custom
    }

    fn describes(&self, _route: &RouteDescriptor) -> bool {
        true
    }

    fn summary(&self, _route: &RouteDescriptor) -> Option<String> {
        None
    }

    fn responses(
        &self,
        _ctx: &mut GenerationContext<'_>,
        _route: &RouteDescriptor,
    ) -> Result<Vec<StatusResponse>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(kind: ActionKind, relation: Option<&str>) -> RouteDescriptor {
        RouteDescriptor {
            name: "v1.posts.show".into(),
            resource: "posts".into(),
            relation: relation.map(str::to_string),
            action: "show".into(),
            kind,
            method: Some(http::Method::GET),
            uri: "/posts/{post}".into(),
            path_parameter: Some("post".into()),
        }
    }

    #[test]
    fn test_resolve_picks_matching_descriptor() {
        assert_eq!(resolve(&route(ActionKind::Show, None)).kind(), ActionKind::Show);
        assert_eq!(
            resolve(&route(ActionKind::FetchRelationship, Some("author"))).kind(),
            ActionKind::FetchRelationship
        );
        assert_eq!(
            resolve(&route(ActionKind::AttachRelationship, Some("tags"))).kind(),
            ActionKind::AttachRelationship
        );
    }

    #[test]
    fn test_resolve_falls_back_to_custom() {
        assert_eq!(resolve(&route(ActionKind::Custom, None)).kind(), ActionKind::Custom);
        // relation-less relationship kind can't be described by its own descriptor
        assert_eq!(
            resolve(&route(ActionKind::FetchRelationship, None)).kind(),
            ActionKind::Custom
        );
    }

    #[test]
    fn test_default_summaries() {
        let show = route(ActionKind::Show, None);
        assert_eq!(Index.summary(&show).as_deref(), Some("Get all posts"));
        assert_eq!(Show.summary(&show).as_deref(), Some("Show one post"));
        assert_eq!(Destroy.summary(&show).as_deref(), Some("Destroy one post"));
        let tags = route(ActionKind::AttachRelationship, Some("tags"));
        assert_eq!(AttachRelationship.summary(&tags).as_deref(), Some("Attach tags"));
        assert_eq!(FetchRelationship.summary(&tags).as_deref(), Some("Show tags relation"));
        assert_eq!(Custom.summary(&tags), None);
    }

    #[test]
    fn test_validating_actions() {
        let validating: Vec<ActionKind> = DESCRIPTORS
            .iter()
            .filter(|d| d.validates())
            .map(|d| d.kind())
            .collect();
        assert_eq!(
            validating,
            vec![
                ActionKind::Store,
                ActionKind::Update,
                ActionKind::UpdateRelationship,
                ActionKind::AttachRelationship,
                ActionKind::DetachRelationship,
            ]
        );
    }
}
