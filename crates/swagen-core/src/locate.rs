use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{LoadError, LocateError};
use crate::parse::{RawDocument, from_json, from_yaml, is_api_document};

/// Supplies a raw API document, or `None` when nothing usable was found.
pub trait DocumentLocator {
    fn locate(&self) -> Result<Option<Value>, LocateError>;

    /// Human-readable description of where the locator looks.
    fn describe(&self) -> String;
}

/// Reads a JSON or YAML document from disk. `.yaml`/`.yml` files are parsed as
/// YAML, everything else as JSON.
#[derive(Debug, Clone)]
pub struct FileLocator {
    path: PathBuf,
}

impl FileLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        )
    }
}

impl DocumentLocator for FileLocator {
    fn locate(&self) -> Result<Option<Value>, LocateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| LocateError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value = if self.is_yaml() {
            from_yaml(&content)?
        } else {
            from_json(&content)?
        };
        if !is_api_document(&value) {
            log::debug!("{} is not a Swagger/OpenAPI document", self.path.display());
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory document, e.g. one already extracted by a host application.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    value: Option<Value>,
}

impl StaticLocator {
    pub fn new(value: Value) -> Self {
        Self { value: Some(value) }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }
}

impl DocumentLocator for StaticLocator {
    fn locate(&self) -> Result<Option<Value>, LocateError> {
        Ok(self.value.clone().filter(is_api_document))
    }

    fn describe(&self) -> String {
        "in-memory document".to_string()
    }
}

/// Run a locator and read its result into a [`RawDocument`]. A locator that
/// finds nothing is reported as [`LocateError::NotFound`].
pub fn load_document(locator: &dyn DocumentLocator) -> Result<RawDocument, LoadError> {
    let value = locator
        .locate()?
        .ok_or_else(|| LocateError::NotFound(locator.describe()))?;
    Ok(RawDocument::from_value(value)?)
}
