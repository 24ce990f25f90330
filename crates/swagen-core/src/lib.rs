pub mod config;
pub mod error;
pub mod ir;
pub mod locate;
pub mod parse;
pub mod template_store;
pub mod transform;

pub use config::{GenerationOptions, SwagenConfig};
pub use error::{DocumentError, LoadError, LocateError, StoreError};
pub use ir::{CanonicalOperation, ResolvedType};
pub use locate::{DocumentLocator, FileLocator, StaticLocator, load_document};
pub use parse::{DefinitionTable, RawDocument};
pub use template_store::{SavedTemplate, TemplateStore};
pub use transform::{NameCase, normalize, normalize_with_definitions};
