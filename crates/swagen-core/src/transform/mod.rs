pub mod naming;
pub mod normalizer;
pub mod schema_resolver;

pub use naming::{NameCase, function_name, interface_name, to_case};
pub use normalizer::{normalize, normalize_with_definitions};
pub use schema_resolver::SchemaResolver;
