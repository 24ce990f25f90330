use indexmap::IndexMap;

use crate::emitters::{AxiosEmitter, ClientEmitter, FetchEmitter, KyEmitter, SuperagentEmitter};
use crate::error::GeneratorError;

/// Calling conventions by name.
pub struct EmitterRegistry {
    emitters: IndexMap<String, Box<dyn ClientEmitter>>,
}

impl EmitterRegistry {
    /// A registry with no conventions at all.
    pub fn empty() -> Self {
        Self {
            emitters: IndexMap::new(),
        }
    }

    /// A registry with `fetch`, `axios`, `ky` and `superagent`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(FetchEmitter));
        registry.register(Box::new(AxiosEmitter));
        registry.register(Box::new(KyEmitter));
        registry.register(Box::new(SuperagentEmitter));
        registry
    }

    /// Add an emitter under its own name, returning the one it replaces.
    pub fn register(&mut self, emitter: Box<dyn ClientEmitter>) -> Option<Box<dyn ClientEmitter>> {
        let name = emitter.name().to_string();
        let previous = self.emitters.insert(name.clone(), emitter);
        if previous.is_some() {
            log::debug!("replaced emitter `{name}`");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Result<&dyn ClientEmitter, GeneratorError> {
        self.emitters
            .get(name)
            .map(|e| e.as_ref())
            .ok_or_else(|| GeneratorError::UnsupportedConvention(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.emitters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.emitters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ClientEmitter> {
        self.emitters.values().map(|e| e.as_ref())
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.emitters.keys()).finish()
    }
}
