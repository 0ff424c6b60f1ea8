use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::descriptors::resolve;
use crate::error::Result;
use crate::inflect::ucfirst;
use crate::route::RouteDescriptor;
use crate::spec::{IntoRef, Operation};

use super::responses::error_responses;
use super::GenerationContext;

/// Build the operation for a classified route.
///
/// Returns `Ok(None)` for routes that only answer `HEAD` and for
/// combinations the action can't express, such as attaching to a to-one
/// relation.
pub fn build_operation(
    ctx: &mut GenerationContext<'_>,
    route: &RouteDescriptor,
) -> Result<Option<Operation>> {
    if route.method.is_none() {
        debug!(route = %route.name, "Skipping HEAD-only route");
        return Ok(None);
    }

    let descriptor = resolve(route);
    if !descriptor.supports(ctx, route)? {
        warn!(
            route = %route.name,
            kind = %route.kind,
            "Route isn't supported by its relation, no operation emitted"
        );
        return Ok(None);
    }

    let operation_id = route.operation_id();
    let config = ctx.config;
    let overrides = config.operation(&operation_id);

    let mut tags = vec![ucfirst(&route.resource)];
    for tag in overrides.into_iter().flat_map(|o| o.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let parameters = descriptor.parameters(ctx, route)?;
    let request_body = descriptor.request_body(ctx, route)?.map(IntoRef::into_ref);
    let mut responses: BTreeMap<_, _> = descriptor.responses(ctx, route)?.into_iter().collect();
    responses.extend(error_responses(
        route.has_path_parameter(),
        descriptor.validates(),
    ));

    Ok(Some(Operation {
        tags,
        summary: overrides
            .and_then(|o| o.summary.clone())
            .or_else(|| descriptor.summary(route)),
        description: overrides.and_then(|o| o.description.clone()),
        operation_id: Some(operation_id),
        parameters,
        request_body,
        responses: Some(responses),
        ..Operation::default()
    }))
}
