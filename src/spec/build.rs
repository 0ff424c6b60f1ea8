use std::collections::BTreeMap;

use http::Method;
use serde_json::Value;

use super::{
    Example, MediaType, MediaTypeExamples, ObjectOrReference, ObjectSchema, Operation, Parameter,
    ParameterIn, ParameterStyle, PathItem, RequestBody, Response, SchemaType, SchemaTypeSet,
    JSONAPI_MEDIA_TYPE,
};

/// A `$ref` pointer into the components section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub ref_path: String,
}

impl Reference {
    pub fn new(ref_path: impl Into<String>) -> Self {
        Reference {
            ref_path: ref_path.into(),
        }
    }
}

impl<T> From<Reference> for ObjectOrReference<T> {
    fn from(reference: Reference) -> Self {
        ObjectOrReference::Ref {
            ref_path: reference.ref_path,
            summary: None,
            description: None,
        }
    }
}

/// Anything that can stand where the model accepts an object or a `$ref`.
pub trait IntoRef<T> {
    fn into_ref(self) -> ObjectOrReference<T>;
}

impl<T> IntoRef<T> for ObjectOrReference<T> {
    fn into_ref(self) -> ObjectOrReference<T> {
        self
    }
}

impl<T> IntoRef<T> for Reference {
    fn into_ref(self) -> ObjectOrReference<T> {
        self.into()
    }
}

impl IntoRef<ObjectSchema> for ObjectSchema {
    fn into_ref(self) -> ObjectOrReference<ObjectSchema> {
        ObjectOrReference::Object(self)
    }
}

impl IntoRef<Parameter> for Parameter {
    fn into_ref(self) -> ObjectOrReference<Parameter> {
        ObjectOrReference::Object(self)
    }
}

impl IntoRef<Response> for Response {
    fn into_ref(self) -> ObjectOrReference<Response> {
        ObjectOrReference::Object(self)
    }
}

impl IntoRef<RequestBody> for RequestBody {
    fn into_ref(self) -> ObjectOrReference<RequestBody> {
        ObjectOrReference::Object(self)
    }
}

/// Accessors for either side of an [`ObjectOrReference`].
pub trait ObjectOrReferenceExt<T> {
    fn ref_path(&self) -> Option<&str>;
    fn object(&self) -> Option<&T>;
}

impl<T> ObjectOrReferenceExt<T> for ObjectOrReference<T> {
    fn ref_path(&self) -> Option<&str> {
        match self {
            ObjectOrReference::Ref { ref_path, .. } => Some(ref_path),
            ObjectOrReference::Object(_) => None,
        }
    }

    fn object(&self) -> Option<&T> {
        match self {
            ObjectOrReference::Ref { .. } => None,
            ObjectOrReference::Object(object) => Some(object),
        }
    }
}

/// Chained construction of [`ObjectSchema`]s.
///
/// ```
/// use jsonapi_openapi::spec::{ObjectSchema, SchemaExt};
///
/// let schema = ObjectSchema::object()
///     .title("Helper/JSONAPI")
///     .property("version", ObjectSchema::string().example("1.0"))
///     .required(["version"]);
/// assert_eq!(schema.required, vec!["version".to_string()]);
/// ```
pub trait SchemaExt: Sized {
    fn of_type(schema_type: SchemaType) -> Self;

    fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    fn array(items: impl IntoRef<ObjectSchema>) -> Self;
    fn one_of(variants: Vec<ObjectOrReference<ObjectSchema>>) -> Self;
    fn title(self, title: impl Into<String>) -> Self;
    fn description(self, description: impl Into<String>) -> Self;
    fn property(self, name: impl Into<String>, schema: impl IntoRef<ObjectSchema>) -> Self;
    fn required<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
    fn enum_values<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>;
    fn default_value(self, value: impl Into<Value>) -> Self;
    fn example(self, value: impl Into<Value>) -> Self;
    /// Set the example only when one is available.
    fn maybe_example(self, value: Option<Value>) -> Self;
    /// `readOnly: true` when set, omitted otherwise.
    fn read_only(self, read_only: bool) -> Self;
    fn is_array(&self) -> bool;
}

impl SchemaExt for ObjectSchema {
    fn of_type(schema_type: SchemaType) -> Self {
        ObjectSchema {
            schema_type: Some(SchemaTypeSet::Single(schema_type)),
            ..ObjectSchema::default()
        }
    }

    fn array(items: impl IntoRef<ObjectSchema>) -> Self {
        ObjectSchema {
            items: Some(Box::new(oas3::spec::Schema::Object(Box::new(
                items.into_ref(),
            )))),
            ..ObjectSchema::of_type(SchemaType::Array)
        }
    }

    fn one_of(variants: Vec<ObjectOrReference<ObjectSchema>>) -> Self {
        ObjectSchema {
            one_of: variants,
            ..ObjectSchema::default()
        }
    }

    fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn property(mut self, name: impl Into<String>, schema: impl IntoRef<ObjectSchema>) -> Self {
        self.properties.insert(name.into(), schema.into_ref());
        self
    }

    fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }

    fn enum_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn example(mut self, value: impl Into<Value>) -> Self {
        self.example = Some(value.into());
        self
    }

    fn maybe_example(mut self, value: Option<Value>) -> Self {
        self.example = value;
        self
    }

    fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only.then_some(true);
        self
    }

    fn is_array(&self) -> bool {
        self.schema_type
            .as_ref()
            .is_some_and(|t| t.contains(SchemaType::Array))
    }
}

fn example(value: Value) -> ObjectOrReference<Example> {
    ObjectOrReference::Object(Example {
        value: Some(value),
        ..Example::default()
    })
}

/// Chained construction of [`Parameter`]s.
pub trait ParameterExt: Sized {
    /// Optional query parameter with the given schema.
    fn query(name: impl Into<String>, schema: ObjectSchema) -> Self;
    /// Required path parameter with the given schema.
    fn path(name: impl Into<String>, schema: ObjectSchema) -> Self;
    fn description(self, description: impl Into<String>) -> Self;
    fn allow_empty_value(self, allow: bool) -> Self;
    fn style(self, style: ParameterStyle, explode: bool) -> Self;
    fn example(self, key: impl Into<String>, value: Value) -> Self;
}

impl ParameterExt for Parameter {
    fn query(name: impl Into<String>, schema: ObjectSchema) -> Self {
        Parameter {
            name: name.into(),
            location: ParameterIn::Query,
            description: None,
            required: Some(false),
            deprecated: None,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: Some(ObjectOrReference::Object(schema)),
            example: None,
            examples: BTreeMap::new(),
            content: None,
            extensions: BTreeMap::new(),
        }
    }

    fn path(name: impl Into<String>, schema: ObjectSchema) -> Self {
        Parameter {
            location: ParameterIn::Path,
            required: Some(true),
            ..Parameter::query(name, schema)
        }
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn allow_empty_value(mut self, allow: bool) -> Self {
        self.allow_empty_value = Some(allow);
        self
    }

    fn style(mut self, style: ParameterStyle, explode: bool) -> Self {
        self.style = Some(style);
        self.explode = Some(explode);
        self
    }

    fn example(mut self, key: impl Into<String>, value: Value) -> Self {
        self.examples.insert(key.into(), example(value));
        self
    }
}

fn jsonapi_content(schema: ObjectOrReference<ObjectSchema>) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(
        JSONAPI_MEDIA_TYPE.to_string(),
        MediaType {
            schema: Some(schema),
            ..MediaType::default()
        },
    );
    content
}

pub trait ResponseExt: Sized {
    /// Response without a body.
    fn empty(description: impl Into<String>) -> Self;
    /// JSON:API response whose body follows `schema`.
    fn jsonapi(description: impl Into<String>, schema: impl IntoRef<ObjectSchema>) -> Self;
    /// Attach a named example to the JSON:API media type, if present.
    fn with_example(self, key: impl Into<String>, value: Value) -> Self;
}

impl ResponseExt for Response {
    fn empty(description: impl Into<String>) -> Self {
        Response {
            description: Some(description.into()),
            ..Response::default()
        }
    }

    fn jsonapi(description: impl Into<String>, schema: impl IntoRef<ObjectSchema>) -> Self {
        Response {
            content: jsonapi_content(schema.into_ref()),
            ..Response::empty(description)
        }
    }

    fn with_example(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Some(media) = self.content.get_mut(JSONAPI_MEDIA_TYPE) {
            let mut examples = match media.examples.take() {
                Some(MediaTypeExamples::Examples { examples }) => examples,
                _ => BTreeMap::new(),
            };
            examples.insert(key.into(), example(value));
            media.examples = Some(MediaTypeExamples::Examples { examples });
        }
        self
    }
}

pub trait RequestBodyExt {
    /// Required JSON:API request body with the given schema.
    fn jsonapi(schema: impl IntoRef<ObjectSchema>) -> Self;
}

impl RequestBodyExt for RequestBody {
    fn jsonapi(schema: impl IntoRef<ObjectSchema>) -> Self {
        RequestBody {
            description: None,
            content: jsonapi_content(schema.into_ref()),
            required: Some(true),
        }
    }
}

/// Method-keyed access to a [`PathItem`]'s operation slots.
pub trait PathItemExt {
    fn operation(&self, method: &Method) -> Option<&Operation>;
    /// Insert an operation unless the method is already taken.
    ///
    /// Returns `false`, leaving the existing operation in place, when the
    /// method already has one or isn't an OpenAPI operation method.
    fn insert_operation(&mut self, method: &Method, operation: Operation) -> bool;
    fn has_operations(&self) -> bool;
}

fn slot<'p>(item: &'p mut PathItem, method: &Method) -> Option<&'p mut Option<Operation>> {
    Some(match *method {
        Method::GET => &mut item.get,
        Method::PUT => &mut item.put,
        Method::POST => &mut item.post,
        Method::DELETE => &mut item.delete,
        Method::OPTIONS => &mut item.options,
        Method::HEAD => &mut item.head,
        Method::PATCH => &mut item.patch,
        Method::TRACE => &mut item.trace,
        _ => return None,
    })
}

impl PathItemExt for PathItem {
    fn operation(&self, method: &Method) -> Option<&Operation> {
        self.methods()
            .into_iter()
            .find(|(m, _)| m == method)
            .map(|(_, operation)| operation)
    }

    fn insert_operation(&mut self, method: &Method, operation: Operation) -> bool {
        let Some(entry) = slot(self, method) else {
            return false;
        };
        if entry.is_some() {
            return false;
        }
        *entry = Some(operation);
        true
    }

    fn has_operations(&self) -> bool {
        self.methods().into_iter().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_schema_serialization() {
        let schema = ObjectSchema::object()
            .title("Resource/Post/Fetch")
            .property("type", ObjectSchema::string().default_value("posts"))
            .property("id", ObjectSchema::string().example("1"))
            .required(["type", "id"]);
        assert_eq!(
            schema.properties.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["id", "type"]
        );
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["type"]["default"], "posts");
        assert_eq!(value["required"], json!(["type", "id"]));
    }

    #[test]
    fn test_read_only_false_is_omitted() {
        let value = serde_json::to_value(ObjectSchema::string().read_only(false)).unwrap();
        assert!(value.get("readOnly").is_none());
        let value = serde_json::to_value(ObjectSchema::string().read_only(true)).unwrap();
        assert_eq!(value["readOnly"], true);
    }

    #[test]
    fn test_one_of_with_references() {
        let schema = ObjectSchema::one_of(vec![
            Reference::new("#/components/schemas/a").into(),
            Reference::new("#/components/schemas/b").into(),
        ]);
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["oneOf"][1]["$ref"], "#/components/schemas/b");
        assert!(value.get("type").is_none());
    }

    #[test]
    fn test_array_items() {
        let schema = ObjectSchema::array(ObjectSchema::default());
        assert!(schema.is_array());
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["items"], json!({}));
        let value = serde_json::to_value(ObjectSchema::array(Reference::new("#/x"))).unwrap();
        assert_eq!(value["items"]["$ref"], "#/x");
    }

    #[test]
    fn test_parameter_builders() {
        let path = Parameter::path("post", ObjectSchema::string()).example("1", json!("1"));
        assert_eq!(path.location, ParameterIn::Path);
        assert_eq!(path.required, Some(true));
        let value = serde_json::to_value(&path).unwrap();
        assert_eq!(value["in"], "path");
        assert_eq!(value["examples"]["1"]["value"], "1");

        let query = Parameter::query("sort", ObjectSchema::string()).style(ParameterStyle::Form, false);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["style"], "form");
        assert_eq!(value["explode"], false);
    }

    #[test]
    fn test_response_examples_accumulate() {
        let response = Response::jsonapi("Failure", Reference::new("#/components/schemas/f"))
            .with_example("a", json!(1))
            .with_example("b", json!(2));
        let value = serde_json::to_value(&response).unwrap();
        let media = &value["content"][JSONAPI_MEDIA_TYPE];
        assert_eq!(media["schema"]["$ref"], "#/components/schemas/f");
        assert_eq!(media["examples"]["a"]["value"], 1);
        assert_eq!(media["examples"]["b"]["value"], 2);

        let empty = serde_json::to_value(Response::empty("No Content")).unwrap();
        assert_eq!(empty, json!({"description": "No Content"}));
    }

    #[test]
    fn test_path_item_keeps_first_operation() {
        let mut item = PathItem::default();
        assert!(!item.has_operations());
        let first = Operation {
            operation_id: Some("posts.index".into()),
            ..Operation::default()
        };
        let second = Operation {
            operation_id: Some("posts.list".into()),
            ..Operation::default()
        };
        assert!(item.insert_operation(&Method::GET, first));
        assert!(!item.insert_operation(&Method::GET, second));
        assert!(item.has_operations());
        assert_eq!(
            item.operation(&Method::GET).and_then(|op| op.operation_id.as_deref()),
            Some("posts.index")
        );
        assert!(item.operation(&Method::POST).is_none());
    }
}
