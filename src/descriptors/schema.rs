//! Field/schema descriptor
//!
//! Renders a resource schema's fields as OpenAPI schemas for the four
//! contexts JSON:API needs: the resource object returned by reads
//! (`fetch`), the objects accepted by `store` and `update`, and the
//! `{type, id}` linkage of a relationship.
//!
//! Every top-level schema is registered in the component store under a
//! deterministic object id and handed back as a reference:
//!
//! | Object id | Schema |
//! |-----------|--------|
//! | `resources.{type}.resource.{fetch,store,update}` | resource object |
//! | `resources.{type}.relationship.{relation}.fetch` | single linkage object |
//! | `resources.{type}.relationship.{relation}.{update,attach,detach}` | relationship request document |
//! | `resources.{type}.related.{relation}.fetch` | `oneOf` of the inverse types' resource objects |

use serde_json::{json, Value};

use crate::components::{Component, ComponentKind};
use crate::error::{GeneratorError, Result};
use crate::generator::GenerationContext;
use crate::inflect::{singular, ucfirst};
use crate::source::{Field, FieldKind, Relation, ResourceSchema, SampleResource};
use crate::spec::{IntoRef, ObjectOrReference, ObjectSchema, Reference, SchemaExt};

/// Which resource object variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceContext {
    Fetch,
    Store,
    Update,
}

impl ResourceContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceContext::Fetch => "fetch",
            ResourceContext::Store => "store",
            ResourceContext::Update => "update",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ResourceContext::Fetch => "Fetch",
            ResourceContext::Store => "Store",
            ResourceContext::Update => "Update",
        }
    }
}

/// Relationship request variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipRequest {
    Update,
    Attach,
    Detach,
}

impl RelationshipRequest {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipRequest::Update => "update",
            RelationshipRequest::Attach => "attach",
            RelationshipRequest::Detach => "detach",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            RelationshipRequest::Update => "Update",
            RelationshipRequest::Attach => "Attach",
            RelationshipRequest::Detach => "Detach",
        }
    }
}

pub fn resource_object_id(resource_type: &str, context: ResourceContext) -> String {
    format!("resources.{}.resource.{}", resource_type, context.as_str())
}

pub fn relationship_object_id(resource_type: &str, relation: &str, action: &str) -> String {
    format!("resources.{}.relationship.{}.{}", resource_type, relation, action)
}

pub fn related_object_id(resource_type: &str, relation: &str) -> String {
    format!("resources.{}.related.{}.fetch", resource_type, relation)
}

fn resource_title(resource_type: &str) -> String {
    format!("Resource/{}", ucfirst(&singular(resource_type)))
}

/// Reference to the resource object schema of `resource_type` in `context`.
///
/// # Errors
///
/// [`GeneratorError::UnknownResource`] if the type isn't registered.
pub fn resource_schema(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    context: ResourceContext,
) -> Result<Reference> {
    let object_id = resource_object_id(resource_type, context);
    if let Some(reference) = ctx.components.get(ComponentKind::Schema, &object_id) {
        return Ok(reference);
    }

    let schemas = ctx.schemas();
    let schema = schemas.schema_for(resource_type)?;
    let sample = ctx.resources.resource(schemas.model_for(resource_type));

    let mut object = ObjectSchema::object()
        .title(format!("{}/{}", resource_title(resource_type), context.title()))
        .property(
            "type",
            ObjectSchema::string().title("type").default_value(resource_type),
        );
    if context != ResourceContext::Store {
        object = object.property(
            "id",
            ObjectSchema::string()
                .title("id")
                .maybe_example(sample.as_ref().map(|s| json!(s.id))),
        );
    }
    object = object.property("attributes", attributes(schema, sample.as_ref()));
    if let Some(relationships) = relationships(ctx, resource_type, schema, context)? {
        object = object.property("relationships", relationships);
    }
    object = match context {
        ResourceContext::Store => object.required(["type", "attributes"]),
        ResourceContext::Fetch | ResourceContext::Update => {
            object.required(["type", "id", "attributes"])
        }
    };

    Ok(ctx.components.add(&object_id, Component::Schema(object)))
}

fn attributes(schema: &ResourceSchema, sample: Option<&SampleResource>) -> ObjectSchema {
    schema
        .attributes()
        .filter_map(|field| attribute(field, sample).map(|s| (field.name.as_str(), s)))
        .fold(ObjectSchema::object().title("attributes"), |object, (name, s)| {
            object.property(name, s)
        })
}

/// Schema of one attribute field; `None` for ids and relations.
pub fn attribute(field: &Field, sample: Option<&SampleResource>) -> Option<ObjectSchema> {
    let schema = match field.kind {
        FieldKind::Boolean => ObjectSchema::boolean(),
        FieldKind::Number => ObjectSchema::number(),
        FieldKind::ArrayList => ObjectSchema::array(ObjectSchema::default()),
        FieldKind::ArrayHash | FieldKind::Map => ObjectSchema::object(),
        FieldKind::String | FieldKind::DateTime => ObjectSchema::string(),
        FieldKind::Id | FieldKind::Relation { .. } | FieldKind::Polymorphic { .. } => {
            return None
        }
    };
    let example = sample.and_then(|s| s.attribute(&field.name)).cloned();
    Some(
        schema
            .title(field.name.as_str())
            .maybe_example(example)
            .read_only(field.read_only),
    )
}

fn relationships(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    schema: &ResourceSchema,
    context: ResourceContext,
) -> Result<Option<ObjectSchema>> {
    let mut object = ObjectSchema::object().title("relationships");
    for relation in schema.relationships() {
        let mut property = ObjectSchema::object()
            .title(relation.name)
            .read_only(relation.read_only);
        if let Some(data) = relationship_data(ctx, resource_type, relation)? {
            property = property.property("data", data);
        }
        if context == ResourceContext::Fetch {
            property = property.property("links", relationship_links(ctx, resource_type, relation.name));
        }
        object = object.property(relation.name, property);
    }
    Ok((!object.properties.is_empty()).then_some(object))
}

/// The `data` member of a relationship: the linkage reference, wrapped in an
/// array for to-many relations. `None` when no inverse type is registered.
pub fn relationship_data(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: Relation<'_>,
) -> Result<Option<ObjectOrReference<ObjectSchema>>> {
    let Some(linkage) = relationship_linkage(ctx, resource_type, relation)? else {
        return Ok(None);
    };
    Ok(Some(if relation.is_to_many() {
        ObjectSchema::array(linkage).into_ref()
    } else {
        linkage.into()
    }))
}

/// Inverse types of `relation` that the server registers, in declaration order.
///
/// Empty when none is registered. A polymorphic relation registering only
/// some of its types is a configuration error.
fn registered_inverse_types<'r>(
    ctx: &GenerationContext<'_>,
    relation: Relation<'r>,
) -> Result<Vec<&'r str>> {
    let schemas = ctx.schemas();
    let (registered, missing): (Vec<&str>, Vec<&str>) = relation
        .inverse_types()
        .into_iter()
        .partition(|t| schemas.contains(t));
    match missing.first() {
        Some(missing) if !registered.is_empty() => Err(GeneratorError::UnknownResource {
            resource: missing.to_string(),
        }),
        _ => Ok(registered),
    }
}

/// Reference to the single linkage object of a relation.
///
/// Polymorphic relations yield a `oneOf` with one `{type, id}` shape per
/// inverse type. `None` when none of the inverse types is registered, as
/// there is nothing to link to.
///
/// # Errors
///
/// [`GeneratorError::UnknownResource`] for a polymorphic relation with some
/// but not all inverse types registered.
pub fn relationship_linkage(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: Relation<'_>,
) -> Result<Option<Reference>> {
    let object_id = relationship_object_id(resource_type, relation.name, "fetch");
    if let Some(reference) = ctx.components.get(ComponentKind::Schema, &object_id) {
        return Ok(Some(reference));
    }

    let registered = registered_inverse_types(ctx, relation)?;
    let Some(first) = registered.first() else {
        return Ok(None);
    };

    let title = format!(
        "{}/Relationship/{}/Fetch",
        resource_title(resource_type),
        ucfirst(relation.name)
    );
    let linkage = if relation.is_polymorphic() {
        let shapes = registered
            .iter()
            .map(|inverse| linkage_shape(ctx, inverse, true).into_ref())
            .collect();
        ObjectSchema::one_of(shapes).title(title)
    } else {
        linkage_shape(ctx, first, false).title(title)
    };
    Ok(Some(ctx.components.add(&object_id, Component::Schema(linkage))))
}

fn linkage_shape(ctx: &mut GenerationContext<'_>, inverse: &str, constrained: bool) -> ObjectSchema {
    let model = ctx.schemas().model_for(inverse);
    let sample_id = ctx.resources.sample_id(model);
    let type_schema = if constrained {
        ObjectSchema::string().title("type").enum_values([inverse])
    } else {
        ObjectSchema::string().title("type").default_value(inverse)
    };
    ObjectSchema::object()
        .property("type", type_schema)
        .property(
            "id",
            ObjectSchema::string().title("id").maybe_example(sample_id.map(Value::from)),
        )
        .required(["type", "id"])
}

/// Read-only `links` object of a relationship with `self` and `related` URLs.
pub fn relationship_links(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: &str,
) -> ObjectSchema {
    let model = ctx.schemas().model_for(resource_type);
    let resource_url = ctx
        .resources
        .sample_id(model)
        .map(|id| format!("{}/{}/{}", ctx.base_url(), resource_type, id));
    let link = |suffix: String| {
        ObjectSchema::string().maybe_example(resource_url.as_ref().map(|url| json!(format!("{}/{}", url, suffix))))
    };
    ObjectSchema::object()
        .title("links")
        .read_only(true)
        .property("related", link(relation.to_string()))
        .property("self", link(format!("relationships/{}", relation)))
}

/// Reference to the schema of the resources a relation points at.
///
/// Non-polymorphic relations reuse the inverse type's fetch schema.
/// Polymorphic relations get a `oneOf` over every inverse type's fetch
/// schema, in declaration order.
///
/// # Errors
///
/// [`GeneratorError::UnknownResource`] unless every inverse type is registered.
pub fn related_schema(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: Relation<'_>,
) -> Result<Reference> {
    if !relation.is_polymorphic() {
        let inverse = relation.inverse_types().into_iter().next().ok_or_else(|| {
            GeneratorError::UnknownRelationship {
                resource: resource_type.to_string(),
                relation: relation.name.to_string(),
            }
        })?;
        return resource_schema(ctx, inverse, ResourceContext::Fetch);
    }

    let object_id = related_object_id(resource_type, relation.name);
    if let Some(reference) = ctx.components.get(ComponentKind::Schema, &object_id) {
        return Ok(reference);
    }
    let registered = registered_inverse_types(ctx, relation)?;
    if registered.is_empty() {
        return Err(GeneratorError::UnknownResource {
            resource: relation.inverse_types().join("|"),
        });
    }
    let mut variants: Vec<ObjectOrReference<ObjectSchema>> = Vec::new();
    for inverse in registered {
        variants.push(resource_schema(ctx, inverse, ResourceContext::Fetch)?.into());
    }
    let union = ObjectSchema::one_of(variants).title(format!(
        "{}/Related/{}/Fetch",
        resource_title(resource_type),
        ucfirst(relation.name)
    ));
    Ok(ctx.components.add(&object_id, Component::Schema(union)))
}

/// Reference to the request document of a relationship update, attach or detach.
///
/// # Errors
///
/// [`GeneratorError::UnknownResource`] when none of the relation's inverse
/// types is registered.
pub fn relationship_request(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: Relation<'_>,
    request: RelationshipRequest,
) -> Result<Reference> {
    let object_id = relationship_object_id(resource_type, relation.name, request.as_str());
    if let Some(reference) = ctx.components.get(ComponentKind::Schema, &object_id) {
        return Ok(reference);
    }
    let data = required_relationship_data(ctx, resource_type, relation)?;
    let document = ObjectSchema::object()
        .title(format!(
            "{}/Relationship/{}/{}",
            resource_title(resource_type),
            ucfirst(relation.name),
            request.title()
        ))
        .property("data", data)
        .required(["data"]);
    Ok(ctx.components.add(&object_id, Component::Schema(document)))
}

/// Like [`relationship_data`] but an unregistered inverse is a configuration error.
pub fn required_relationship_data(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
    relation: Relation<'_>,
) -> Result<ObjectOrReference<ObjectSchema>> {
    relationship_data(ctx, resource_type, relation)?.ok_or_else(|| {
        GeneratorError::UnknownResource {
            resource: relation.inverse_types().join("|"),
        }
    })
}
