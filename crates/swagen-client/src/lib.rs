pub mod emitters;
pub mod error;
pub mod registry;
pub mod template;
pub mod type_mapper;

pub use emitters::{ClientEmitter, QueryArrayStyle};
pub use error::GeneratorError;
pub use registry::EmitterRegistry;
pub use template::{EmitterFragments, FragmentProvider, builtin_template, prelude, render};
