//! Response builders shared by the action descriptors.

use crate::spec::{
    IntoRef, ObjectOrReference, ObjectSchema, Reference, RequestBody, RequestBodyExt, Response,
    ResponseExt, SchemaExt,
};

use super::defaults::{jsonapi_reference, ErrorResponse};

/// A status code and its response.
pub type StatusResponse = (String, ObjectOrReference<Response>);

/// Top-level JSON:API document: `jsonapi`, `data` and optional `links`.
pub fn document(
    data: ObjectOrReference<ObjectSchema>,
    links: Option<ObjectSchema>,
) -> ObjectSchema {
    let mut document = ObjectSchema::object()
        .property("jsonapi", jsonapi_reference())
        .property("data", data);
    if let Some(links) = links {
        document = document.property("links", links);
    }
    document.required(["jsonapi", "data"])
}

/// `data` holding one resource, or an array of them.
pub fn data(reference: Reference, many: bool) -> ObjectOrReference<ObjectSchema> {
    if many {
        ObjectSchema::array(reference).into_ref()
    } else {
        reference.into()
    }
}

/// Success response whose body is a JSON:API document.
pub fn success(status: u16, description: impl Into<String>, body: ObjectSchema) -> StatusResponse {
    (
        status.to_string(),
        Response::jsonapi(description, body).into_ref(),
    )
}

/// `204 No Content`.
pub fn no_content() -> StatusResponse {
    ("204".to_string(), Response::empty("No Content").into_ref())
}

/// Request body `{data: ...}` around a resource object.
pub fn resource_request(reference: Reference) -> RequestBody {
    RequestBody::jsonapi(
        ObjectSchema::object()
            .property("data", reference)
            .required(["data"]),
    )
}

/// The default error responses for an operation.
///
/// 400, 401 and 403 are always present; 404 only when the route carries a
/// path identifier and 422 only when the action validates input.
pub fn error_responses(has_id: bool, validates: bool) -> Vec<StatusResponse> {
    ErrorResponse::ALL
        .into_iter()
        .filter(|error| match error {
            ErrorResponse::NotFound => has_id,
            ErrorResponse::UnprocessableEntity => validates,
            _ => true,
        })
        .map(|error| (error.status().to_string(), error.reference().into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ObjectOrReferenceExt;

    fn statuses(responses: &[StatusResponse]) -> Vec<&str> {
        responses.iter().map(|(status, _)| status.as_str()).collect()
    }

    #[test]
    fn test_error_responses_are_conditional() {
        assert_eq!(statuses(&error_responses(false, false)), vec!["400", "401", "403"]);
        assert_eq!(
            statuses(&error_responses(true, false)),
            vec!["400", "401", "403", "404"]
        );
        assert_eq!(
            statuses(&error_responses(true, true)),
            vec!["400", "401", "403", "404", "422"]
        );
        assert_eq!(
            statuses(&error_responses(false, true)),
            vec!["400", "401", "403", "422"]
        );
    }

    #[test]
    fn test_document_envelope() {
        let body = document(
            data(Reference::new("#/components/schemas/resources.posts.resource.fetch"), true),
            None,
        );
        assert_eq!(
            body.properties["jsonapi"].ref_path(),
            Some("#/components/schemas/helper.jsonapi")
        );
        assert!(body.properties["data"].object().is_some_and(|d| d.is_array()));
        assert_eq!(body.required, vec!["jsonapi", "data"]);
        assert!(!body.properties.contains_key("links"));
    }
}
