use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GeneratorError, Result};

/// Route default naming the path parameter that carries the resource id.
pub const RESOURCE_ID_NAME: &str = "resource_id_name";

/// A route as exposed by the host framework's route table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    /// Dotted route name, e.g. `v1.posts.comments.show`
    pub name: String,
    /// HTTP methods, in declaration order (may include `HEAD`)
    pub methods: Vec<String>,
    /// URI template as registered, with or without a leading `/`
    pub uri: String,
    /// Default route parameters
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub controller: Option<ControllerRef>,
}

impl RawRoute {
    /// Name of the path parameter holding the resource id, if any.
    pub fn resource_id_name(&self) -> Option<&str> {
        self.defaults
            .get(RESOURCE_ID_NAME)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Controller callable bound to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerRef {
    /// Callable reference, e.g. `PostController@index`
    pub action: String,
    /// Shared behaviour the controller method comes from, when declared
    #[serde(default)]
    pub behavior: Option<ControllerBehavior>,
}

/// Shared controller behaviours a route's handler can be declared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerBehavior {
    FetchMany,
    FetchOne,
    Store,
    Update,
    Destroy,
    FetchRelated,
    FetchRelationship,
    UpdateRelationship,
    AttachRelationship,
    DetachRelationship,
}

/// Pagination strategy of a resource schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    #[default]
    None,
    /// `page[number]` / `page[size]`
    Page,
    /// `page[limit]` / `page[after]` / `page[before]`
    Cursor,
    /// `page[limit]` / `page[offset]`
    Offset,
}

/// Whether a relation points at one or many resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    ToOne,
    ToMany,
}

/// Closed set of field kinds a resource schema can declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Id,
    String,
    Boolean,
    Number,
    DateTime,
    ArrayList,
    ArrayHash,
    Map,
    Relation {
        inverse: String,
        #[serde(default)]
        cardinality: Cardinality,
    },
    Polymorphic {
        inverse_types: Vec<String>,
        #[serde(default)]
        cardinality: Cardinality,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub read_only: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            read_only: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Relation view of this field, or `None` for attributes and ids.
    pub fn relation(&self) -> Option<Relation<'_>> {
        let (target, cardinality) = match &self.kind {
            FieldKind::Relation {
                inverse,
                cardinality,
            } => (RelationTarget::Single(inverse.as_str()), *cardinality),
            FieldKind::Polymorphic {
                inverse_types,
                cardinality,
            } => (RelationTarget::Polymorphic(inverse_types.as_slice()), *cardinality),
            _ => return None,
        };
        Some(Relation {
            name: &self.name,
            target,
            cardinality,
            read_only: self.read_only,
        })
    }

    pub fn is_attribute(&self) -> bool {
        !matches!(
            self.kind,
            FieldKind::Id | FieldKind::Relation { .. } | FieldKind::Polymorphic { .. }
        )
    }
}

/// Resource type(s) a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationTarget<'a> {
    Single(&'a str),
    Polymorphic(&'a [String]),
}

/// Borrowed view of a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation<'a> {
    pub name: &'a str,
    pub target: RelationTarget<'a>,
    pub cardinality: Cardinality,
    pub read_only: bool,
}

impl<'a> Relation<'a> {
    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self.target, RelationTarget::Polymorphic(_))
    }

    /// Every possible inverse type, in declaration order.
    pub fn inverse_types(&self) -> Vec<&'a str> {
        match self.target {
            RelationTarget::Single(inverse) => vec![inverse],
            RelationTarget::Polymorphic(types) => types.iter().map(String::as_str).collect(),
        }
    }
}

/// Closed set of filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Where,
    WhereIn,
    WhereNotIn,
    WhereIdIn,
    WhereIdNotIn,
    Scope,
    WithTrashed,
    OnlyTrashed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Query key, rendered as `filter[key]`
    pub key: String,
    pub kind: FilterKind,
    /// Attribute the filter reads, when it differs from the key
    #[serde(default)]
    pub column: Option<String>,
}

impl Filter {
    pub fn new(key: impl Into<String>, kind: FilterKind) -> Self {
        Filter {
            key: key.into(),
            kind,
            column: None,
        }
    }

    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.key)
    }
}

/// Schema of one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Model identity used to look up sample records; defaults to the resource type
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sortable: Vec<String>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl ResourceSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        ResourceSchema {
            model: None,
            fields,
            filters: Vec::new(),
            sortable: Vec::new(),
            pagination: Pagination::None,
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_attribute())
    }

    pub fn relationships(&self) -> impl Iterator<Item = Relation<'_>> {
        self.fields.iter().filter_map(Field::relation)
    }

    pub fn relationship(&self, name: &str) -> Option<Relation<'_>> {
        self.relationships().find(|r| r.name == name)
    }

    pub fn is_relationship(&self, name: &str) -> bool {
        self.relationship(name).is_some()
    }
}

/// Resource type → schema, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, ResourceSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource_type: impl Into<String>, schema: ResourceSchema) {
        self.schemas.insert(resource_type.into(), schema);
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.schemas.contains_key(resource_type)
    }

    /// Schema for a resource type, or [`GeneratorError::UnknownResource`].
    pub fn schema_for(&self, resource_type: &str) -> Result<&ResourceSchema> {
        self.schemas
            .get(resource_type)
            .ok_or_else(|| GeneratorError::UnknownResource {
                resource: resource_type.to_string(),
            })
    }

    /// Model identity of a resource type (the type itself when undeclared).
    pub fn model_for<'a>(&'a self, resource_type: &'a str) -> &'a str {
        self.schemas
            .get(resource_type)
            .and_then(|s| s.model.as_deref())
            .unwrap_or(resource_type)
    }
}

/// A concrete record rendered as a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResource {
    pub id: String,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
}

impl SampleResource {
    /// Attribute value, treating `null` like an absent value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }
}
