//! Default components every document carries: the JSON:API helper schemas,
//! the error responses and the reusable sort/paging parameters.

use serde_json::{json, Value};

use crate::components::{Component, ComponentKind, ComponentStore};
use crate::spec::{
    ObjectSchema, Parameter, ParameterExt, ParameterStyle, Reference, Response, ResponseExt,
    SchemaExt,
};

pub const JSONAPI_SCHEMA: &str = "helper.jsonapi";
pub const ERRORS_SCHEMA: &str = "helper.errors";
pub const FAILURE_SCHEMA: &str = "helper.failure";

pub const SORT_PARAMETER: &str = "sort";
pub const PAGE_SIZE_PARAMETER: &str = "pageSize";
pub const PAGE_NUMBER_PARAMETER: &str = "pageNumber";
pub const PAGE_LIMIT_PARAMETER: &str = "pageLimit";
pub const PAGE_OFFSET_PARAMETER: &str = "pageOffset";

/// Default error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorResponse {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
}

impl ErrorResponse {
    pub const ALL: [ErrorResponse; 5] = [
        ErrorResponse::BadRequest,
        ErrorResponse::Unauthorized,
        ErrorResponse::Forbidden,
        ErrorResponse::NotFound,
        ErrorResponse::UnprocessableEntity,
    ];

    pub fn status(&self) -> &'static str {
        match self {
            ErrorResponse::BadRequest => "400",
            ErrorResponse::Unauthorized => "401",
            ErrorResponse::Forbidden => "403",
            ErrorResponse::NotFound => "404",
            ErrorResponse::UnprocessableEntity => "422",
        }
    }

    /// Object id under `components/responses`.
    pub fn object_id(&self) -> &'static str {
        match self {
            ErrorResponse::BadRequest => "bad_request",
            ErrorResponse::Unauthorized => "unauthorized",
            ErrorResponse::Forbidden => "forbidden",
            ErrorResponse::NotFound => "not_found",
            ErrorResponse::UnprocessableEntity => "unprocessable_entity",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ErrorResponse::BadRequest => "Bad request",
            ErrorResponse::Unauthorized => "Unauthorized Action",
            ErrorResponse::Forbidden => "Forbidden Action",
            ErrorResponse::NotFound => "Content Not Found",
            ErrorResponse::UnprocessableEntity => "Unprocessable Entity",
        }
    }

    fn example(&self) -> Value {
        let error = match self {
            ErrorResponse::BadRequest => json!({
                "detail": "The member id is required.",
                "source": {"pointer": "/data"},
                "status": "400",
                "title": "Non-Compliant JSON:API Document"
            }),
            ErrorResponse::Unauthorized => json!({
                "detail": "Unauthenticated.",
                "status": "401",
                "title": "Unauthorized."
            }),
            ErrorResponse::Forbidden => json!({
                "detail": "This action is unauthorized.",
                "status": "403",
                "title": "Forbidden"
            }),
            ErrorResponse::NotFound => json!({
                "status": "404",
                "title": "Not Found"
            }),
            ErrorResponse::UnprocessableEntity => json!({
                "detail": "Lorem Ipsum",
                "source": {"pointer": "/data/attributes/lorem"},
                "status": "422",
                "title": "Unprocessable Entity"
            }),
        };
        json!({"jsonapi": {"version": "1.0"}, "errors": [error]})
    }

    /// Reference to the registered response.
    pub fn reference(&self) -> Reference {
        ComponentKind::Response.reference(self.object_id())
    }

    fn response(&self) -> Response {
        Response::jsonapi(
            self.description(),
            ComponentKind::Schema.reference(FAILURE_SCHEMA),
        )
        .with_example(self.object_id(), self.example())
    }
}

/// Reference to the `helper.jsonapi` schema.
pub fn jsonapi_reference() -> Reference {
    ComponentKind::Schema.reference(JSONAPI_SCHEMA)
}

/// Register the default schemas, error responses and reusable parameters.
pub fn register_defaults(store: &mut ComponentStore) {
    store.add(
        JSONAPI_SCHEMA,
        Component::Schema(
            ObjectSchema::object()
                .title("Helper/JSONAPI")
                .property("version", ObjectSchema::string().title("version").example("1.0"))
                .required(["version"]),
        ),
    );

    let error = ObjectSchema::object()
        .title("Error")
        .property("detail", ObjectSchema::string().title("detail"))
        .property("status", ObjectSchema::string().title("status"))
        .property("title", ObjectSchema::string().title("title"))
        .property(
            "source",
            ObjectSchema::object()
                .title("source")
                .property("pointer", ObjectSchema::string().title("pointer")),
        )
        .required(["status", "title"]);
    store.add(
        ERRORS_SCHEMA,
        Component::Schema(ObjectSchema::array(error).title("Helper/Errors")),
    );

    store.add(
        FAILURE_SCHEMA,
        Component::Schema(
            ObjectSchema::object()
                .title("Helper/Failure")
                .property("jsonapi", jsonapi_reference())
                .property("errors", ComponentKind::Schema.reference(ERRORS_SCHEMA))
                .required(["errors"]),
        ),
    );

    for error in ErrorResponse::ALL {
        store.add(error.object_id(), Component::Response(error.response()));
    }

    for (object_id, parameter) in reusable_parameters() {
        store.add(object_id, Component::Parameter(parameter));
    }
}

fn reusable_parameters() -> [(&'static str, Parameter); 5] {
    let page = |name: &str, description: &str| {
        Parameter::query(name, ObjectSchema::integer())
            .description(description)
            .allow_empty_value(false)
    };
    [
        (
            SORT_PARAMETER,
            Parameter::query("sort", ObjectSchema::array(ObjectSchema::string()))
                .description("Fields to sort by, prefixed with - for descending order")
                .allow_empty_value(false)
                .style(ParameterStyle::Form, false),
        ),
        (
            PAGE_SIZE_PARAMETER,
            page("page[size]", "The page size for paginated results"),
        ),
        (
            PAGE_NUMBER_PARAMETER,
            page("page[number]", "The page number for paginated results"),
        ),
        (
            PAGE_LIMIT_PARAMETER,
            page("page[limit]", "The page limit for paginated results"),
        ),
        (
            PAGE_OFFSET_PARAMETER,
            page("page[offset]", "The page offset for paginated results"),
        ),
    ]
}
