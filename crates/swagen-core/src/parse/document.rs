use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::schema::{RawSchemaNode, TypeSet};
use crate::error::{DocumentError, value_kind};
use crate::ir::ParameterLocation;

/// Which family of API description a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
}

/// API metadata. Scalars of any kind are read as text (`version: 1.0`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawInfo {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(default, deserialize_with = "optional_scalar_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The as-fetched Swagger 2.0 / OpenAPI 3.x document.
///
/// `paths` is kept as a raw JSON value so the normalizer can report a missing
/// or mistyped `paths` member and walk it in authored key order.
///
/// Only `paths` is checked. Everything else is read leniently: entries that
/// cannot be read are dropped with a warning instead of failing the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "optional_scalar_string", skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,

    #[serde(default, deserialize_with = "optional_scalar_string", skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(default, deserialize_with = "readable_or_none", skip_serializing_if = "Option::is_none")]
    pub info: Option<RawInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Value>,

    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, RawSchemaNode>,

    /// Swagger 2.0 shared parameters.
    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    /// Swagger 2.0 shared responses.
    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, deserialize_with = "readable_or_none", skip_serializing_if = "Option::is_none")]
    pub components: Option<RawComponents>,
}

impl RawDocument {
    /// Read a document out of an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        serde_json::from_value(value).map_err(DocumentError::Malformed)
    }

    pub fn spec_version(&self) -> Option<SpecVersion> {
        if self.swagger.as_deref() == Some("2.0") {
            Some(SpecVersion::Swagger2)
        } else if self.openapi.as_deref().is_some_and(|v| v.starts_with('3')) {
            Some(SpecVersion::OpenApi3)
        } else {
            None
        }
    }

    /// The `paths` member, which must be present and an object.
    pub fn paths_object(&self) -> Result<&serde_json::Map<String, serde_json::Value>, DocumentError> {
        match &self.paths {
            None => Err(DocumentError::MissingPaths),
            Some(serde_json::Value::Object(map)) => Ok(map),
            Some(other) => Err(DocumentError::PathsNotObject(value_kind(other))),
        }
    }
}

/// OpenAPI 3.x reusable components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawComponents {
    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, RawSchemaNode>,

    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(
        rename = "requestBodies",
        default,
        deserialize_with = "readable_entries",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,

    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,
}

/// One method entry under a path item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "readable_items", skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(
        rename = "requestBody",
        default,
        deserialize_with = "readable_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default, deserialize_with = "readable_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// A parameter in either dialect: Swagger 2.0 scalar fields or a `schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchemaNode>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RawSchemaNode>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
}

impl RawParameter {
    /// Normalize to a single schema-shaped node. An explicit `schema` wins;
    /// otherwise the Swagger 2.0 scalar fields are folded into one.
    pub fn schema_node(&self) -> Option<RawSchemaNode> {
        if let Some(schema) = &self.schema {
            return Some(schema.clone());
        }
        if self.param_type.is_none() && self.items.is_none() && self.enum_values.is_empty() {
            return None;
        }
        let schema_type = self.param_type.clone().or_else(|| {
            self.items
                .as_ref()
                .map(|_| TypeSet::Single("array".to_string()))
        });
        Some(RawSchemaNode {
            schema_type,
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            ..RawSchemaNode::default()
        })
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(RawParameter),
}

/// Media type entry of a `content` map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchemaNode>,
}

/// OpenAPI 3.x request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, RawMediaType>,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RawRequestBody),
}

/// A response in either dialect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Swagger 2.0 response schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchemaNode>,

    /// OpenAPI 3.x response content.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, RawMediaType>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(RawResponse),
}

/// Pick the JSON entry of a `content` map: exact `application/json`, else the
/// first media type mentioning `json`.
pub fn json_media_type(content: &IndexMap<String, RawMediaType>) -> Option<&RawMediaType> {
    content.get("application/json").or_else(|| {
        content
            .iter()
            .find(|(key, _)| key.contains("json"))
            .map(|(_, media)| media)
    })
}

/// Text of a scalar value: strings as-is, numbers and booleans printed.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a list, dropping the items that are not a `T`.
pub fn read_items<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| {
                let label = item
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|name| format!(" `{name}`"))
                    .unwrap_or_default();
                serde_json::from_value(item)
                    .inspect_err(|e| log::warn!("skipping unreadable entry{label}: {e}"))
                    .ok()
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            log::warn!("expected a list, found {}; ignoring it", value_kind(&other));
            Vec::new()
        }
    }
}

/// Read a keyed map, dropping the entries whose value is not a `T`.
pub fn read_entries<T: DeserializeOwned>(value: Value) -> IndexMap<String, T> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some((key, parsed)),
                Err(e) => {
                    log::warn!("skipping unreadable entry `{key}`: {e}");
                    None
                }
            })
            .collect(),
        Value::Null => IndexMap::new(),
        other => {
            log::warn!("expected an object, found {}; ignoring it", value_kind(&other));
            IndexMap::new()
        }
    }
}

fn readable_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(read_items(Value::deserialize(deserializer)?))
}

fn readable_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(read_entries(Value::deserialize(deserializer)?))
}

fn readable_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(serde_json::from_value(value)
            .inspect_err(|e| log::warn!("ignoring unreadable member: {e}"))
            .ok()),
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_scalar_string(deserializer)?.unwrap_or_default())
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
