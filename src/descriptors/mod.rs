//! Descriptors turn classified routes and resource schemas into OpenAPI
//! fragments: resource object schemas, filter parameters and per-action
//! operation parts.

pub mod actions;
pub mod filters;
pub mod schema;

pub use actions::{resolve, ActionDescriptor, DESCRIPTORS};
pub use filters::{filter_parameters, FilterDescriptor};
pub use schema::{RelationshipRequest, ResourceContext};
