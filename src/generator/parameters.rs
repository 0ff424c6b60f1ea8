//! Parameter builders shared by the action descriptors.

use serde_json::json;

use crate::components::ComponentKind;
use crate::error::Result;
use crate::route::{template_parameters, RouteDescriptor};
use crate::source::Pagination;
use crate::spec::{
    IntoRef, ObjectOrReference, ObjectSchema, Parameter, ParameterExt, ParameterStyle, SchemaExt,
};

use super::defaults::{
    PAGE_LIMIT_PARAMETER, PAGE_NUMBER_PARAMETER, PAGE_OFFSET_PARAMETER, PAGE_SIZE_PARAMETER,
};
use super::GenerationContext;

/// Path parameters of `route`: one required string parameter per URI
/// placeholder, in template order.
///
/// The resource id placeholder refers to the parameter registered once per
/// resource and name under `resources.{type}.parameters.{name}`; any other
/// placeholder is declared inline.
pub fn path_parameters(
    ctx: &mut GenerationContext<'_>,
    route: &RouteDescriptor,
) -> Result<Vec<ObjectOrReference<Parameter>>> {
    let mut params = Vec::new();
    for name in template_parameters(&route.uri) {
        if route.path_parameter.as_deref() == Some(name.as_str()) {
            params.push(id_parameter(ctx, route, &name)?);
        } else {
            params.push(Parameter::path(name.as_str(), ObjectSchema::string()).into_ref());
        }
    }
    Ok(params)
}

fn id_parameter(
    ctx: &mut GenerationContext<'_>,
    route: &RouteDescriptor,
    name: &str,
) -> Result<ObjectOrReference<Parameter>> {
    let object_id = format!("resources.{}.parameters.{}", route.resource, name);
    let model = ctx.schemas().model_for(&route.resource);
    let ids = ctx.resources.sample_ids(model);
    let reference = ctx.components.parameter_or_insert_with(&object_id, || {
        Ok(ids.into_iter().fold(
            Parameter::path(name, ObjectSchema::string())
                .description(format!("The id of the {} resource", route.resource)),
            |p, id| p.example(id.clone(), json!(id)),
        ))
    })?;
    Ok(reference.into())
}

/// Paging parameters for the schema's pagination strategy.
pub fn pagination_parameters(pagination: Pagination) -> Vec<ObjectOrReference<Parameter>> {
    let reference = |id: &str| -> ObjectOrReference<Parameter> {
        ComponentKind::Parameter.reference(id).into()
    };
    let cursor = |name: &str, description: &str| {
        Parameter::query(name, ObjectSchema::string())
            .description(description)
            .allow_empty_value(false)
            .into_ref()
    };
    match pagination {
        Pagination::None => Vec::new(),
        Pagination::Page => vec![
            reference(PAGE_NUMBER_PARAMETER),
            reference(PAGE_SIZE_PARAMETER),
        ],
        Pagination::Cursor => vec![
            reference(PAGE_LIMIT_PARAMETER),
            cursor("page[after]", "The cursor after which results start"),
            cursor("page[before]", "The cursor before which results end"),
        ],
        Pagination::Offset => vec![
            reference(PAGE_LIMIT_PARAMETER),
            reference(PAGE_OFFSET_PARAMETER),
        ],
    }
}

/// `sort` parameter enumerating `field` and `-field` for each sortable field.
pub fn sort_parameter(sortable: &[String]) -> Option<Parameter> {
    if sortable.is_empty() {
        return None;
    }
    let values = sortable
        .iter()
        .flat_map(|field| [field.clone(), format!("-{}", field)]);
    Some(
        Parameter::query(
            "sort",
            ObjectSchema::array(ObjectSchema::string().enum_values(values)),
        )
            .description("Fields to sort by, prefixed with - for descending order")
            .allow_empty_value(false)
            .style(ParameterStyle::Form, false),
    )
}
