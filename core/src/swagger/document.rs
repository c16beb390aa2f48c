#![deny(missing_docs)]

//! # Swagger Document Model
//!
//! Deserialization layer for Swagger 2.0 documents. These structs map directly
//! to the YAML/JSON objects; fields the resolver never reads are kept in `extra`.

use crate::error::{ResolveError, ResolveResult};
use crate::swagger::pointer::Reference;
use indexmap::IndexMap;
use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// The root of a parsed Swagger 2.0 document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Declared Swagger version (e.g. `"2.0"`).
    #[serde(default)]
    pub swagger: Option<String>,
    /// Info object, kept raw.
    #[serde(default)]
    pub info: Option<Value>,
    /// Host serving the API.
    #[serde(default)]
    pub host: Option<String>,
    /// Base path prefixed to every path.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Path items keyed by path template.
    #[serde(default)]
    pub paths: Paths,
    /// Schema definitions (`#/definitions/...`).
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    /// Shared parameters (`#/parameters/...`).
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    /// Shared responses (`#/responses/...`).
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Security schemes (`#/securityDefinitions/...`).
    #[serde(default)]
    pub security_definitions: IndexMap<String, SecurityScheme>,
}

impl Document {
    /// Parses a document from YAML.
    pub fn from_yaml_str(yaml: &str) -> ResolveResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a document from JSON.
    pub fn from_json_str(json: &str) -> ResolveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts an already-parsed JSON value into a document.
    pub fn from_value(raw: Value) -> ResolveResult<Self> {
        Ok(serde_json::from_value(raw)?)
    }

    /// Looks up a path item by its template, e.g. `/pets/{id}`.
    pub fn path(&self, key: &str) -> ResolveResult<&PathItem> {
        section_get(&self.paths.items, key)
    }

    /// Looks up a schema definition.
    pub fn definition(&self, key: &str) -> ResolveResult<&Schema> {
        section_get(&self.definitions, key)
    }

    /// Looks up a shared parameter.
    pub fn parameter(&self, key: &str) -> ResolveResult<&Parameter> {
        section_get(&self.parameters, key)
    }

    /// Looks up a shared response.
    pub fn response(&self, key: &str) -> ResolveResult<&Response> {
        section_get(&self.responses, key)
    }

    /// Looks up a security scheme.
    pub fn security_definition(&self, key: &str) -> ResolveResult<&SecurityScheme> {
        section_get(&self.security_definitions, key)
    }
}

fn section_get<'a, T>(section: &'a IndexMap<String, T>, key: &str) -> ResolveResult<&'a T> {
    section
        .get(key)
        .ok_or_else(|| ResolveError::MissingDocumentProperty(key.to_string()))
}

/// The Paths Object, with specification extensions split out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    /// Parsed path items keyed by path template.
    pub items: IndexMap<String, PathItem>,
    /// Spec extensions attached to the Paths Object (x-...).
    pub extensions: IndexMap<String, Value>,
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();
        let mut extensions = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                extensions.insert(key, value);
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                D::Error::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items, extensions })
    }
}

/// A Schema Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref` standing in for the whole schema.
    #[serde(rename = "$ref", default)]
    pub reference: Option<Reference>,
    /// Type tag (`object`, `array`, `string`, ...).
    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,
    /// Format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Names of required properties.
    #[serde(default)]
    pub required: Vec<String>,
    /// Declared properties, in document order.
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    /// Composed schemas, in declaration order.
    #[serde(default)]
    pub all_of: Vec<Schema>,
    /// Wildcard schema for undeclared properties.
    #[serde(default)]
    pub additional_properties: Option<AdditionalProperties>,
    /// Item schema for arrays.
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    /// Discriminator property name.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Everything else (validation keywords, examples, `x-` extensions).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Schema {
    /// A schema consisting only of a `$ref`.
    pub fn from_reference(reference: Reference) -> Self {
        Self {
            reference: Some(reference),
            ..Self::default()
        }
    }

    /// An inline schema with just a type tag.
    pub fn typed(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// The wildcard sub-schema, when `additionalProperties` holds one.
    pub fn wildcard(&self) -> Option<&Schema> {
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    /// True for object-like schemas: typed `object`, or declaring
    /// properties, composition or a wildcard.
    pub fn is_object(&self) -> bool {
        self.schema_type.as_deref() == Some("object")
            || !self.properties.is_empty()
            || !self.all_of.is_empty()
            || self.wildcard().is_some()
    }
}

/// `additionalProperties`: either a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` / `false`.
    Allowed(bool),
    /// A schema every undeclared property must satisfy.
    Schema(Box<Schema>),
}

/// A Parameter Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// `$ref` into `#/parameters`.
    #[serde(rename = "$ref", default)]
    pub reference: Option<Reference>,
    /// Parameter name.
    #[serde(default)]
    pub name: Option<String>,
    /// Location: `query`, `header`, `path`, `formData` or `body`.
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Type tag for non-body parameters.
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    /// Format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Item type for array parameters.
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    /// Array serialization (`csv`, `multi`, ...).
    #[serde(default)]
    pub collection_format: Option<String>,
    /// Body schema for `in: body`.
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A Response Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// `$ref` into `#/responses`.
    #[serde(rename = "$ref", default)]
    pub reference: Option<Reference>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Body schema.
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Response headers.
    #[serde(default)]
    pub headers: IndexMap<String, Header>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A response Header Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Header {
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Type tag.
    #[serde(rename = "type", default)]
    pub header_type: Option<String>,
    /// Format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Item type for array headers.
    #[serde(default)]
    pub items: Option<Box<Schema>>,
}

/// A Path Item Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    /// `$ref` to a path item defined elsewhere.
    #[serde(rename = "$ref", default)]
    pub reference: Option<Reference>,
    /// GET operation.
    #[serde(default)]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default)]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default)]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default)]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default)]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default)]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(default)]
    pub patch: Option<Operation>,
    /// Parameters shared by all operations of this path.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Returns the operation for an HTTP method (case-insensitive).
    pub fn operation(&self, method: &str) -> ResolveResult<&Operation> {
        let method = method.to_ascii_lowercase();
        let op = match method.as_str() {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            _ => None,
        };
        op.ok_or(ResolveError::MissingDocumentProperty(method))
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Accepted request media types.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Produced response media types.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code, including `default`.
    #[serde(default, deserialize_with = "deserialize_status_map")]
    pub responses: IndexMap<String, Response>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
    /// Security requirements.
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

impl Operation {
    /// The `default` response, if declared.
    pub fn default_response(&self) -> Option<&Response> {
        self.responses.get("default")
    }
}

/// A Security Scheme Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// `basic`, `apiKey` or `oauth2`.
    #[serde(rename = "type", default)]
    pub scheme_type: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Header or query parameter name for `apiKey`.
    #[serde(default)]
    pub name: Option<String>,
    /// `query` or `header` for `apiKey`.
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// OAuth2 flow.
    #[serde(default)]
    pub flow: Option<String>,
    /// OAuth2 authorization URL.
    #[serde(default)]
    pub authorization_url: Option<String>,
    /// OAuth2 token URL.
    #[serde(default)]
    pub token_url: Option<String>,
    /// OAuth2 scopes.
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// YAML writes status codes as bare integers (`200:`); accept both forms.
fn deserialize_status_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Response>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<StatusKey, Response>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k.0, v)).collect())
}

#[derive(PartialEq, Eq, Hash)]
struct StatusKey(String);

impl<'de> Deserialize<'de> for StatusKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StatusKeyVisitor;

        impl Visitor<'_> for StatusKeyVisitor {
            type Value = StatusKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a status code or `default`")
            }

            fn visit_str<E: DeError>(self, v: &str) -> Result<StatusKey, E> {
                Ok(StatusKey(v.to_string()))
            }

            fn visit_string<E: DeError>(self, v: String) -> Result<StatusKey, E> {
                Ok(StatusKey(v))
            }

            fn visit_u64<E: DeError>(self, v: u64) -> Result<StatusKey, E> {
                Ok(StatusKey(v.to_string()))
            }

            fn visit_i64<E: DeError>(self, v: i64) -> Result<StatusKey, E> {
                Ok(StatusKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(StatusKeyVisitor)
    }
}
