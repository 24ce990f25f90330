use std::path::PathBuf;

use thiserror::Error;

/// Failures while obtaining a raw document from a locator.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no Swagger/OpenAPI document found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// A raw document that is present but structurally unusable.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document has no `paths` object")]
    MissingPaths,

    #[error("document `paths` must be an object, found {0}")]
    PathsNotObject(&'static str),

    #[error("malformed document: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Either way [`load_document`](crate::locate::load_document) can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Failures of the saved-template store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access template store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template store is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no saved template with id `{0}`")]
    UnknownTemplate(String),
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
