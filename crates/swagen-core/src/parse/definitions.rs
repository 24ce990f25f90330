use indexmap::IndexMap;

use super::document::RawDocument;
use super::schema::RawSchemaNode;

/// Named schema definitions, merged from Swagger 2.0 `definitions` and
/// OpenAPI 3.x `components.schemas`.
///
/// When both sources define the same name, `components.schemas` wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionTable {
    schemas: IndexMap<String, RawSchemaNode>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for a document.
    pub fn from_document(doc: &RawDocument) -> Self {
        let mut table = Self::new();
        for (name, node) in &doc.definitions {
            table.insert(name.clone(), node.clone());
        }
        if let Some(components) = &doc.components {
            for (name, node) in &components.schemas {
                if table.insert(name.clone(), node.clone()).is_some() {
                    log::debug!(
                        "schema `{name}` defined in both `definitions` and `components.schemas`; using components.schemas"
                    );
                }
            }
        }
        table
    }

    /// Add definitions that are absent from this table. Entries already present
    /// (i.e. those taken from the document itself) are kept.
    pub fn with_fallback(mut self, fallback: &DefinitionTable) -> Self {
        for (name, node) in &fallback.schemas {
            if !self.schemas.contains_key(name) {
                self.schemas.insert(name.clone(), node.clone());
            }
        }
        self
    }

    pub fn insert(&mut self, name: String, node: RawSchemaNode) -> Option<RawSchemaNode> {
        self.schemas.insert(name, node)
    }

    pub fn get(&self, name: &str) -> Option<&RawSchemaNode> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<(String, RawSchemaNode)> for DefinitionTable {
    fn from_iter<I: IntoIterator<Item = (String, RawSchemaNode)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}
