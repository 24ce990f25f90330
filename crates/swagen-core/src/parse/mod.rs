pub mod definitions;
pub mod document;
pub mod schema;

pub use definitions::DefinitionTable;
pub use document::{RawDocument, RawOperation, RawParameter, SpecVersion};
pub use schema::RawSchemaNode;

use crate::error::LocateError;

/// Parse JSON text into a raw value, keeping authored key order.
pub fn from_json(input: &str) -> Result<serde_json::Value, LocateError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse YAML text into a raw value, keeping authored key order.
pub fn from_yaml(input: &str) -> Result<serde_json::Value, LocateError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Whether a value looks like a Swagger 2.0 or OpenAPI 3.x document:
/// a version marker plus `paths` and `info`.
pub fn is_api_document(value: &serde_json::Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if !obj.contains_key("paths") || !obj.contains_key("info") {
        return false;
    }
    let swagger = obj.get("swagger").and_then(document::scalar_text).as_deref() == Some("2.0");
    let openapi = obj
        .get("openapi")
        .and_then(document::scalar_text)
        .is_some_and(|v| v.starts_with('3'));
    swagger || openapi
}
