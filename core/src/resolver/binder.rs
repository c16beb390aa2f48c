#![deny(missing_docs)]

//! # Data Binding
//!
//! Walks raw JSON data alongside a (resolved) schema and produces named,
//! typed containers.
//!
//! - `array` nodes bind every entry against the item type, preserving order.
//! - Object schemas bind every key of the data through property resolution.
//!   A key no schema defines aborts the whole binding.
//! - Anything else is passed through unchanged.
//!
//! Recursion follows the data, so cyclic schemas terminate as long as the
//! data does.

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::Resolver;
use crate::swagger::NodeRef;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{instrument, trace};

/// The result of binding data against a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// Data bound against an object schema.
    Container(BoundContainer),
    /// Data bound against an array type.
    Sequence(Vec<Bound>),
    /// Data passed through untouched.
    Raw(Value),
}

impl Bound {
    /// The container, if this is one.
    pub fn as_container(&self) -> Option<&BoundContainer> {
        match self {
            Bound::Container(c) => Some(c),
            _ => None,
        }
    }

    /// The sequence, if this is one.
    pub fn as_sequence(&self) -> Option<&[Bound]> {
        match self {
            Bound::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The passthrough value, if this is one.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Bound::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// Drops type names and returns plain JSON.
    pub fn into_json(self) -> Value {
        match self {
            Bound::Container(c) => c.into_json(),
            Bound::Sequence(items) => {
                Value::Array(items.into_iter().map(Bound::into_json).collect())
            }
            Bound::Raw(v) => v,
        }
    }
}

/// A named, ordered property bag produced from an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundContainer {
    type_name: String,
    properties: IndexMap<String, Bound>,
}

impl BoundContainer {
    /// An empty container.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: IndexMap::new(),
        }
    }

    /// The definition name for referenced schemas, else the type tag (possibly empty).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The bound value of a property.
    pub fn get(&self, key: &str) -> Option<&Bound> {
        self.properties.get(key)
    }

    /// Properties in data order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Property keys in data order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when no property was bound.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Drops type names and returns a JSON object.
    pub fn into_json(self) -> Value {
        let map: Map<String, Value> = self
            .properties
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect();
        Value::Object(map)
    }
}

impl<'a> Resolver<'a> {
    /// Binds `data` against `node`.
    ///
    /// Returns a [`Bound::Container`] for object schemas, a [`Bound::Sequence`]
    /// for array types and [`Bound::Raw`] otherwise. Fails fast: no partial
    /// result is returned.
    #[instrument(level = "debug", skip_all)]
    pub fn bind(&self, node: impl Into<NodeRef<'a>>, data: &Value) -> ResolveResult<Bound> {
        self.bind_at(node.into(), data, 0)
    }

    /// Nested lookups run through the resolver that owns the node's document,
    /// so local references inside an external schema stay in that document.
    fn bind_at(&self, node: NodeRef<'a>, data: &Value, depth: usize) -> ResolveResult<Bound> {
        self.guard(depth)?;

        let (owner, resolved, type_name) = match node.reference() {
            Some(reference) => {
                let (owner, resolved) = self.resolve_at(node, depth)?;
                (owner, resolved, reference.target_name().to_string())
            }
            None => (self, node, node.type_tag().unwrap_or_default().to_string()),
        };

        if resolved.type_tag() == Some("array") {
            let items = resolved.items()?;
            let entries: Vec<&Value> = match data {
                Value::Array(values) => values.iter().collect(),
                Value::Object(map) => map.values().collect(),
                _ => Vec::new(),
            };
            trace!(type_name = %type_name, len = entries.len(), "binding sequence");
            return entries
                .into_iter()
                .map(|value| owner.bind_at(items.into(), value, depth + 1))
                .collect::<ResolveResult<Vec<_>>>()
                .map(Bound::Sequence);
        }

        let Some(schema) = resolved.as_schema() else {
            return Ok(Bound::Raw(data.clone()));
        };

        trace!(type_name = %type_name, "binding container");
        let mut container = BoundContainer::new(type_name);
        if let Value::Object(map) = data {
            for (key, value) in map {
                let (declared_in, property) = owner
                    .property_at(schema, key, depth + 1)?
                    .ok_or_else(|| ResolveError::UndefinedPropertySchema {
                        property: key.clone(),
                        schema: container.type_name.clone(),
                    })?;
                let bound = declared_in.bind_at(property.into(), value, depth + 1)?;
                container.properties.insert(key.clone(), bound);
            }
        }
        Ok(Bound::Container(container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverOptions;
    use crate::swagger::{Document, Parameter, Schema};
    use serde_json::json;

    const DOC: &str = r##"
definitions:
  Pet:
    type: object
    properties:
      name: { type: string }
      tags:
        type: array
        items: { $ref: '#/definitions/Tag' }
      owner: { $ref: '#/definitions/Person' }
  Tag:
    type: object
    properties:
      label: { type: string }
  Person:
    type: object
    properties:
      name: { type: string }
      friend: { $ref: '#/definitions/Person' }
  Names:
    type: array
    items: { type: string }
  NoItems:
    type: array
  Untyped: {}
parameters:
  petId: { name: id, in: path, type: string }
  ids: { name: ids, in: query, type: array, items: { type: integer } }
"##;

    fn doc() -> Document {
        Document::from_yaml_str(DOC).unwrap()
    }

    #[test]
    fn test_bind_container_named_after_reference() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let pet = Schema::from_reference(crate::swagger::Reference::parse("#/definitions/Pet"));
        let data = json!({
            "name": "Rex",
            "owner": { "name": "Ann" },
            "tags": [{ "label": "good" }, { "label": "dog" }]
        });

        let bound = resolver.bind(&pet, &data).unwrap();
        let pet = bound.as_container().unwrap();
        assert_eq!(pet.type_name(), "Pet");
        assert_eq!(pet.keys().collect::<Vec<_>>(), ["name", "owner", "tags"]);
        assert_eq!(pet.get("name"), Some(&Bound::Raw(json!("Rex"))));

        let owner = pet.get("owner").unwrap().as_container().unwrap();
        assert_eq!(owner.type_name(), "Person");

        let tags = pet.get("tags").unwrap().as_sequence().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].as_container().unwrap().type_name(), "Tag");
        assert_eq!(
            tags[1].as_container().unwrap().get("label"),
            Some(&Bound::Raw(json!("dog")))
        );

        assert_eq!(bound.into_json(), data);
    }

    #[test]
    fn test_inline_schema_named_after_type_tag() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let bound = resolver
            .bind(d.definition("Tag").unwrap(), &json!({ "label": "x" }))
            .unwrap();
        assert_eq!(bound.as_container().unwrap().type_name(), "object");

        let mut untyped = Schema::default();
        untyped.properties.insert("a".into(), Schema::default());
        let bound = resolver.bind(&untyped, &json!({ "a": 1 })).unwrap();
        assert_eq!(bound.as_container().unwrap().type_name(), "");
    }

    #[test]
    fn test_array_preserves_order() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let data = json!(["c", "a", "b"]);
        let bound = resolver.bind(d.definition("Names").unwrap(), &data).unwrap();
        assert_eq!(
            bound,
            Bound::Sequence(vec![
                Bound::Raw(json!("c")),
                Bound::Raw(json!("a")),
                Bound::Raw(json!("b")),
            ])
        );
    }

    #[test]
    fn test_array_over_object_entries_and_scalars() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let names = d.definition("Names").unwrap();

        let bound = resolver.bind(names, &json!({ "x": "first", "y": "second" })).unwrap();
        assert_eq!(bound.into_json(), json!(["first", "second"]));

        let bound = resolver.bind(names, &Value::Null).unwrap();
        assert_eq!(bound, Bound::Sequence(Vec::new()));
    }

    #[test]
    fn test_array_without_items() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let err = resolver
            .bind(d.definition("NoItems").unwrap(), &json!([1]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingDocumentProperty(p) if p == "items"));
    }

    #[test]
    fn test_unknown_property_fails_fast() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let data = json!({ "name": "Rex", "owner": { "name": "Ann", "age": 3 } });
        match resolver.bind(d.definition("Pet").unwrap(), &data) {
            Err(ResolveError::UndefinedPropertySchema { property, schema }) => {
                assert_eq!(property, "age");
                assert_eq!(schema, "Person");
            }
            other => panic!("Expected UndefinedPropertySchema, got {:?}", other),
        }
    }

    #[test]
    fn test_passthrough_for_leaves_and_non_schemas() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let data = json!({ "anything": [1, 2, 3] });

        let bound = resolver.bind(d.definition("Untyped").unwrap(), &data).unwrap();
        assert_eq!(bound, Bound::Raw(data.clone()));

        let bound = resolver.bind(d.parameter("petId").unwrap(), &json!("42")).unwrap();
        assert_eq!(bound.as_raw(), Some(&json!("42")));
        assert!(bound.as_container().is_none());

        let param_ref = Parameter {
            reference: Some(crate::swagger::Reference::parse("#/parameters/petId")),
            ..Parameter::default()
        };
        let bound = resolver.bind(&param_ref, &data).unwrap();
        assert_eq!(bound, Bound::Raw(data));
    }

    #[test]
    fn test_array_parameter_binds_items() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let bound = resolver
            .bind(d.parameter("ids").unwrap(), &json!([3, 1]))
            .unwrap();
        assert_eq!(bound.into_json(), json!([3, 1]));
    }

    #[test]
    fn test_non_object_data_gives_empty_container() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let bound = resolver.bind(d.definition("Tag").unwrap(), &json!("tag")).unwrap();
        assert!(bound.as_container().unwrap().is_empty());
    }

    #[test]
    fn test_cyclic_schema_terminates_with_data() {
        let d = doc();
        let resolver = Resolver::new(&d);
        let data = json!({ "name": "a", "friend": { "name": "b", "friend": { "name": "c" } } });
        let bound = resolver.bind(d.definition("Person").unwrap(), &data).unwrap();
        assert_eq!(bound.into_json(), data);
    }

    #[test]
    fn test_deep_data_hits_recursion_limit() {
        let d = doc();
        let resolver = Resolver::new(&d).with_options(ResolverOptions { max_depth: 4 });
        let mut data = json!({ "name": "leaf" });
        for _ in 0..8 {
            data = json!({ "friend": data });
        }
        let err = resolver.bind(d.definition("Person").unwrap(), &data).unwrap_err();
        assert!(matches!(err, ResolveError::RecursionLimitExceeded(4)));
    }
}
