use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// The `type` keyword: a single name, or a list of names (OpenAPI 3.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    /// The effective type name: the first entry that is not `null`.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeSet::Single(name) => Some(name.as_str()),
            TypeSet::Multiple(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null")
                .or_else(|| names.first().map(String::as_str)),
        }
    }
}

/// An as-authored schema fragment, Swagger 2.0 and OpenAPI 3.x alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSchemaNode {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RawSchemaNode>,

    #[serde(
        default,
        deserialize_with = "lenient_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Box<RawSchemaNode>>,

    #[serde(
        default,
        deserialize_with = "lenient_required",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl RawSchemaNode {
    /// A node of the given primitive type.
    pub fn of_type(name: &str) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(name.to_string())),
            ..Self::default()
        }
    }

    /// A bare `$ref` node.
    pub fn reference(target: &str) -> Self {
        Self {
            reference: Some(target.to_string()),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(TypeSet::primary)
    }

    /// Enum values when every one of them is a string.
    pub fn string_enum(&self) -> Option<Vec<String>> {
        if self.enum_values.is_empty() {
            return None;
        }
        self.enum_values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// `required` as a list of names; the Swagger 1.x style `required: true` on a
/// property reads as an empty list.
fn lenient_required<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(names) => names
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}

/// `items` as a single schema; tuple-style lists keep their first entry.
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Box<RawSchemaNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(entries)) => entries.into_iter().next(),
        other => other,
    };
    value
        .map(|v| serde_json::from_value(v).map(Box::new))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Extract the definition name a `$ref` points at: its final path segment,
/// exactly as written.
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Final path segment of a `$ref` with JSON-pointer escapes decoded
/// (`~1` → `/`, `~0` → `~`).
pub fn decoded_ref_name(reference: &str) -> String {
    ref_name(reference).replace("~1", "/").replace("~0", "~")
}
