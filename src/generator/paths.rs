use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::route::{base_path, belongs_to, RouteDescriptor};
use crate::source::RawRoute;
use crate::spec::{PathItem, PathItemExt};

use super::operation::build_operation;
use super::GenerationContext;

/// Classify the server's routes, skipping routes that belong to other servers.
pub fn classify_routes(
    routes: &[RawRoute],
    server_name: &str,
    server_url: &str,
    ctx: &GenerationContext<'_>,
) -> Result<Vec<RouteDescriptor>> {
    let base = base_path(server_url);
    routes
        .iter()
        .filter(|route| belongs_to(&route.name, server_name))
        .map(|route| RouteDescriptor::classify(route, server_name, &base, ctx.schemas()))
        .collect()
}

/// Build the path map from classified routes.
///
/// Paths are keyed and sorted by URI. When two routes share a URI and
/// method the first route in table order wins. Path items left without
/// operations are dropped.
pub fn build_paths(
    ctx: &mut GenerationContext<'_>,
    routes: &[RouteDescriptor],
) -> Result<BTreeMap<String, PathItem>> {
    let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
    for route in routes {
        let Some(method) = route.method.as_ref() else {
            debug!(route = %route.name, "Route answers HEAD only");
            continue;
        };
        let item = paths.entry(route.uri.clone()).or_default();
        if item.operation(method).is_some() {
            warn!(
                route = %route.name,
                uri = %route.uri,
                method = %method,
                "Duplicate route for URI and method, keeping the first"
            );
            continue;
        }
        if let Some(operation) = build_operation(ctx, route)? {
            item.insert_operation(method, operation);
        }
    }
    paths.retain(|_, item| item.has_operations());
    Ok(paths)
}
