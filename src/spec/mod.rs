//! # OpenAPI Document Model
//!
//! The generated document is an [`oas3::OpenApiV3Spec`]; this module
//! re-exports the `oas3` object types the generator builds and adds the
//! small builder helpers that keep descriptor code readable, plus YAML/JSON
//! serialization of finished documents.
//!
//! `oas3` keeps paths, schema properties and component buckets in sorted
//! maps, so the serialized document is ordered by key.
mod build;
mod serialize;

pub use build::*;
pub use serialize::*;

pub use oas3::spec::{
    Components, Example, Info, MediaType, MediaTypeExamples, ObjectOrReference, ObjectSchema,
    Operation, Parameter, ParameterIn, ParameterStyle, PathItem, RequestBody, Response,
    SchemaType, SchemaTypeSet, Server, ServerVariable,
};

/// A generated document.
pub type Document = oas3::OpenApiV3Spec;

/// OpenAPI version emitted by the generator.
pub const OPENAPI_VERSION: &str = "3.0.2";

/// JSON:API media type used for every request and response body.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Extension key of the tag groups, serialized as `x-tagGroups`.
pub const TAG_GROUPS_EXTENSION: &str = "tagGroups";
