use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A user-authored template kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTemplate {
    pub id: String,
    pub name: String,
    pub template: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved templates persisted as a JSON array in a single file.
///
/// Mutations only touch memory; call [`TemplateStore::save`] to persist them.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
    templates: Vec<SavedTemplate>,
}

impl TemplateStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let templates = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Vec::new()
        };
        log::debug!("loaded {} saved templates from {}", templates.len(), path.display());
        Ok(Self { path, templates })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.templates)?;
        fs::write(&self.path, content + "\n").map_err(io_err)
    }

    pub fn list(&self) -> &[SavedTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&SavedTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, name: &str, template: &str) -> &SavedTemplate {
        self.add_at(name, template, Utc::now())
    }

    /// Add a template stamped with `now`. The id is `now` in epoch
    /// milliseconds, bumped until it is unique within the store.
    pub fn add_at(&mut self, name: &str, template: &str, now: DateTime<Utc>) -> &SavedTemplate {
        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        let index = self.templates.len();
        self.templates.push(SavedTemplate {
            id: millis.to_string(),
            name: name.to_string(),
            template: template.to_string(),
            created_at: now,
            updated_at: now,
        });
        &self.templates[index]
    }

    /// Change the name and/or text of a saved template.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        template: Option<&str>,
    ) -> Result<&SavedTemplate, StoreError> {
        let entry = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::UnknownTemplate(id.to_string()))?;
        if let Some(name) = name {
            entry.name = name.to_string();
        }
        if let Some(template) = template {
            entry.template = template.to_string();
        }
        entry.updated_at = Utc::now().max(entry.created_at);
        Ok(&*entry)
    }

    pub fn remove(&mut self, id: &str) -> Result<SavedTemplate, StoreError> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::UnknownTemplate(id.to_string()))?;
        Ok(self.templates.remove(index))
    }
}
