//! # Component Store
//!
//! Registry of reusable fragments built during one generation run. Every
//! entry is keyed by a dot-delimited object id such as
//! `resources.posts.resource.fetch`; the id is the entry's only identity.
//!
//! Builders follow get-before-build, register-after-build:
//!
//! ```
//! use jsonapi_openapi::components::ComponentStore;
//! use jsonapi_openapi::spec::{ObjectSchema, SchemaExt};
//!
//! let mut store = ComponentStore::new();
//! let first = store.schema_or_insert_with("helper.jsonapi", || Ok(ObjectSchema::object()))?;
//! let second = store.schema_or_insert_with("helper.jsonapi", || unreachable!())?;
//! assert_eq!(first, second);
//! # Ok::<(), jsonapi_openapi::GeneratorError>(())
//! ```

use tracing::warn;

use crate::error::Result;
use crate::spec::{
    Components, IntoRef, ObjectOrReferenceExt, ObjectSchema, Parameter, Reference, RequestBody,
    Response,
};

/// Components bucket an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Schema,
    RequestBody,
    Response,
    Parameter,
}

impl ComponentKind {
    /// Bucket name as it appears in `#/components/<bucket>/<id>`.
    pub fn bucket(&self) -> &'static str {
        match self {
            ComponentKind::Schema => "schemas",
            ComponentKind::RequestBody => "requestBodies",
            ComponentKind::Response => "responses",
            ComponentKind::Parameter => "parameters",
        }
    }

    /// Reference to `object_id` inside this bucket.
    pub fn reference(&self, object_id: &str) -> Reference {
        Reference::new(format!("#/components/{}/{}", self.bucket(), object_id))
    }
}

/// A fragment to register.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Schema(ObjectSchema),
    RequestBody(RequestBody),
    Response(Response),
    Parameter(Parameter),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Schema(_) => ComponentKind::Schema,
            Component::RequestBody(_) => ComponentKind::RequestBody,
            Component::Response(_) => ComponentKind::Response,
            Component::Parameter(_) => ComponentKind::Parameter,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    components: Components,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference to an existing entry. Never builds anything.
    pub fn get(&self, kind: ComponentKind, object_id: &str) -> Option<Reference> {
        let present = match kind {
            ComponentKind::Schema => self.components.schemas.contains_key(object_id),
            ComponentKind::RequestBody => self.components.request_bodies.contains_key(object_id),
            ComponentKind::Response => self.components.responses.contains_key(object_id),
            ComponentKind::Parameter => self.components.parameters.contains_key(object_id),
        };
        present.then(|| kind.reference(object_id))
    }

    /// Register a fragment and return its reference.
    ///
    /// An id that is already taken keeps its first payload; callers are
    /// expected to [`get`](Self::get) first.
    pub fn add(&mut self, object_id: &str, component: Component) -> Reference {
        let kind = component.kind();
        if self.get(kind, object_id).is_some() {
            warn!(object_id, bucket = kind.bucket(), "Component already registered, keeping the first");
            return kind.reference(object_id);
        }
        let id = object_id.to_string();
        match component {
            Component::Schema(s) => {
                self.components.schemas.insert(id, s.into_ref());
            }
            Component::RequestBody(b) => {
                self.components.request_bodies.insert(id, b.into_ref());
            }
            Component::Response(r) => {
                self.components.responses.insert(id, r.into_ref());
            }
            Component::Parameter(p) => {
                self.components.parameters.insert(id, p.into_ref());
            }
        }
        kind.reference(object_id)
    }

    /// Reference to the schema `object_id`, running `build` only if it isn't registered yet.
    pub fn schema_or_insert_with<F>(&mut self, object_id: &str, build: F) -> Result<Reference>
    where
        F: FnOnce() -> Result<ObjectSchema>,
    {
        if let Some(reference) = self.get(ComponentKind::Schema, object_id) {
            return Ok(reference);
        }
        let schema = build()?;
        Ok(self.add(object_id, Component::Schema(schema)))
    }

    /// Same as [`schema_or_insert_with`](Self::schema_or_insert_with) for parameters.
    pub fn parameter_or_insert_with<F>(&mut self, object_id: &str, build: F) -> Result<Reference>
    where
        F: FnOnce() -> Result<Parameter>,
    {
        if let Some(reference) = self.get(ComponentKind::Parameter, object_id) {
            return Ok(reference);
        }
        let parameter = build()?;
        Ok(self.add(object_id, Component::Parameter(parameter)))
    }

    pub fn schema(&self, object_id: &str) -> Option<&ObjectSchema> {
        self.components.schemas.get(object_id)?.object()
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn into_components(self) -> Components {
        self.components
    }
}
