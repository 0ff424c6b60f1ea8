//! Filter descriptors: one query parameter family per filter kind.

use serde_json::{json, Value};

use crate::generator::GenerationContext;
use crate::source::{Filter, FilterKind};
use crate::spec::{ObjectSchema, Parameter, ParameterExt, ParameterStyle, SchemaExt};

/// Example key for the empty id list.
pub const EMPTY_EXAMPLE: &str = "empty";

/// How a filter is rendered, chosen from its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDescriptor<'f> {
    /// `filter[key]=value`
    Where(&'f Filter),
    /// `filter[key][]=a&filter[key][]=b`
    SetMembership { filter: &'f Filter, negated: bool },
    /// `filter[id]=1,2,3`
    IdMembership { filter: &'f Filter, negated: bool },
    Scope(&'f Filter),
    Trashed { filter: &'f Filter, only: bool },
}

impl<'f> FilterDescriptor<'f> {
    pub fn new(filter: &'f Filter) -> Self {
        match filter.kind {
            FilterKind::Where => FilterDescriptor::Where(filter),
            FilterKind::WhereIn => FilterDescriptor::SetMembership {
                filter,
                negated: false,
            },
            FilterKind::WhereNotIn => FilterDescriptor::SetMembership {
                filter,
                negated: true,
            },
            FilterKind::WhereIdIn => FilterDescriptor::IdMembership {
                filter,
                negated: false,
            },
            FilterKind::WhereIdNotIn => FilterDescriptor::IdMembership {
                filter,
                negated: true,
            },
            FilterKind::Scope => FilterDescriptor::Scope(filter),
            FilterKind::WithTrashed => FilterDescriptor::Trashed {
                filter,
                only: false,
            },
            FilterKind::OnlyTrashed => FilterDescriptor::Trashed { filter, only: true },
        }
    }

    fn filter(&self) -> &'f Filter {
        match *self {
            FilterDescriptor::Where(filter)
            | FilterDescriptor::Scope(filter)
            | FilterDescriptor::SetMembership { filter, .. }
            | FilterDescriptor::IdMembership { filter, .. }
            | FilterDescriptor::Trashed { filter, .. } => filter,
        }
    }

    /// Query parameter name, `filter[key]`.
    pub fn name(&self) -> String {
        format!("filter[{}]", self.filter().key)
    }

    /// Parameters for this filter, with examples taken from `model`'s samples.
    pub fn parameters(&self, ctx: &mut GenerationContext<'_>, model: &str) -> Vec<Parameter> {
        let filter = self.filter();
        let parameter = match *self {
            FilterDescriptor::Where(_) => ctx
                .resources
                .distinct_values(model, filter.column())
                .iter()
                .map(example_text)
                .fold(
                    Parameter::query(self.name(), ObjectSchema::string())
                        .description("Filters the records")
                        .allow_empty_value(false),
                    |p, text| p.example(text.clone(), Value::String(text)),
                ),
            FilterDescriptor::SetMembership { negated, .. } => ctx
                .resources
                .distinct_values(model, filter.column())
                .iter()
                .map(example_text)
                .fold(
                    Parameter::query(self.name(), ObjectSchema::array(ObjectSchema::string()))
                        .description(format!(
                            "A list of {}s to {} by.",
                            filter.key,
                            if negated { "exclude" } else { "filter" }
                        ))
                        .allow_empty_value(false)
                        .style(ParameterStyle::Form, true),
                    |p, text| p.example(text.clone(), json!([text])),
                ),
            FilterDescriptor::IdMembership { negated, .. } => ctx
                .resources
                .sample_ids(model)
                .into_iter()
                .fold(
                    Parameter::query(self.name(), ObjectSchema::array(ObjectSchema::string()))
                        .description(format!(
                            "A list of ids to {} by.",
                            if negated { "exclude" } else { "filter" }
                        ))
                        .allow_empty_value(false)
                        .style(ParameterStyle::Form, false),
                    |p, id| p.example(id.clone(), json!([id])),
                )
                .example(EMPTY_EXAMPLE, json!([])),
            FilterDescriptor::Scope(_) => Parameter::query(self.name(), ObjectSchema::boolean())
                .description(format!("Applies the {} scope.", filter.key))
                .allow_empty_value(false),
            FilterDescriptor::Trashed { only, .. } => {
                Parameter::query(self.name(), ObjectSchema::boolean())
                    .description(if only {
                        "Show only trashed records."
                    } else {
                        "Include trashed records."
                    })
                    .allow_empty_value(false)
            }
        };
        vec![parameter]
    }
}

/// Query strings carry text, so examples are rendered as strings.
fn example_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parameters for every filter declared on `resource_type`, in declaration order.
pub fn filter_parameters(
    ctx: &mut GenerationContext<'_>,
    resource_type: &str,
) -> crate::Result<Vec<Parameter>> {
    let schemas = ctx.schemas();
    let schema = schemas.schema_for(resource_type)?;
    let model = schemas.model_for(resource_type);
    let mut parameters = Vec::new();
    for filter in &schema.filters {
        parameters.extend(FilterDescriptor::new(filter).parameters(ctx, model));
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InfoConfig, ServerConfig};
    use crate::source::{JsonApiServer, ResourceSchema, SampleResource, SchemaRegistry};
    use crate::spec::{ObjectOrReferenceExt, SchemaType, SchemaTypeSet};
    use indexmap::IndexMap;

    struct Posts {
        registry: SchemaRegistry,
        with_records: bool,
    }

    impl JsonApiServer for Posts {
        fn name(&self) -> &str {
            "v1"
        }

        fn base_url(&self) -> &str {
            "http://localhost/api/v1"
        }

        fn schemas(&self) -> &SchemaRegistry {
            &self.registry
        }

        fn records(&self, _model: &str) -> Vec<SampleResource> {
            if !self.with_records {
                return Vec::new();
            }
            ["a", "b", "a"]
                .iter()
                .enumerate()
                .map(|(i, slug)| SampleResource {
                    id: (i + 1).to_string(),
                    attributes: [
                        ("slug".to_string(), json!(slug)),
                        ("views".to_string(), json!(10 * (i + 1))),
                    ]
                    .into_iter()
                    .collect(),
                })
                .collect()
        }
    }

    fn server(filters: Vec<Filter>, with_records: bool) -> Posts {
        let mut schema = ResourceSchema::new(Vec::new());
        schema.filters = filters;
        let mut registry = SchemaRegistry::new();
        registry.insert("posts", schema);
        Posts {
            registry,
            with_records,
        }
    }

    fn config() -> ServerConfig {
        ServerConfig {
            info: InfoConfig {
                title: "Test".into(),
                description: None,
                version: "1".into(),
            },
            tag_groups: Vec::new(),
            operations: IndexMap::new(),
        }
    }

    fn schema(p: &Parameter) -> &ObjectSchema {
        p.schema.as_ref().and_then(|s| s.object()).unwrap()
    }

    fn example<'p>(p: &'p Parameter, key: &str) -> &'p Value {
        p.examples[key].object().and_then(|e| e.value.as_ref()).unwrap()
    }

    fn parameters(filters: Vec<Filter>, with_records: bool) -> Vec<Parameter> {
        let server = server(filters, with_records);
        let config = config();
        let mut ctx = GenerationContext::new(&server, &config);
        filter_parameters(&mut ctx, "posts").unwrap()
    }

    #[test]
    fn test_where_filter_uses_distinct_values() {
        let params = parameters(vec![Filter::new("slug", FilterKind::Where)], true);
        assert_eq!(params.len(), 1);
        let p = &params[0];
        assert_eq!(p.name, "filter[slug]");
        assert_eq!(schema(p).schema_type, Some(SchemaTypeSet::Single(SchemaType::String)));
        assert_eq!(p.examples.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_where_filter_stringifies_numbers() {
        let mut filter = Filter::new("popular", FilterKind::Where);
        filter.column = Some("views".into());
        let params = parameters(vec![filter], true);
        assert_eq!(example(&params[0], "10"), &json!("10"));
    }

    #[test]
    fn test_set_membership_explodes() {
        let params = parameters(
            vec![
                Filter::new("slug", FilterKind::WhereIn),
                Filter::new("slug", FilterKind::WhereNotIn),
            ],
            true,
        );
        assert_eq!(params[0].style, Some(ParameterStyle::Form));
        assert_eq!(params[0].explode, Some(true));
        assert_eq!(params[0].description.as_deref(), Some("A list of slugs to filter by."));
        assert_eq!(example(&params[0], "a"), &json!(["a"]));
        assert_eq!(params[1].description.as_deref(), Some("A list of slugs to exclude by."));
    }

    #[test]
    fn test_id_membership_has_ids_and_empty_example() {
        let params = parameters(vec![Filter::new("id", FilterKind::WhereIdIn)], true);
        let p = &params[0];
        assert_eq!(p.name, "filter[id]");
        assert!(schema(p).is_array());
        assert_eq!(p.explode, Some(false));
        assert_eq!(example(p, "1"), &json!(["1"]));
        assert_eq!(example(p, "3"), &json!(["3"]));
        assert_eq!(example(p, EMPTY_EXAMPLE), &json!([]));
    }

    #[test]
    fn test_missing_samples_degrade_to_no_examples() {
        let params = parameters(
            vec![
                Filter::new("slug", FilterKind::Where),
                Filter::new("id", FilterKind::WhereIdNotIn),
            ],
            false,
        );
        assert!(params[0].examples.is_empty());
        assert_eq!(params[1].examples.len(), 1);
        assert_eq!(params[1].description.as_deref(), Some("A list of ids to exclude by."));
    }

    #[test]
    fn test_boolean_filters() {
        let params = parameters(
            vec![
                Filter::new("published", FilterKind::Scope),
                Filter::new("withTrashed", FilterKind::WithTrashed),
                Filter::new("onlyTrashed", FilterKind::OnlyTrashed),
            ],
            true,
        );
        assert!(params
            .iter()
            .all(|p| schema(p).schema_type == Some(SchemaTypeSet::Single(SchemaType::Boolean))));
        assert_eq!(params[0].description.as_deref(), Some("Applies the published scope."));
        assert_eq!(params[1].description.as_deref(), Some("Include trashed records."));
        assert_eq!(params[2].description.as_deref(), Some("Show only trashed records."));
    }
}
