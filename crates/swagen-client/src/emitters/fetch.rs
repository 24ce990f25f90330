use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;

use super::{ClientEmitter, ImplementationContext, QueryArrayStyle, render_template};
use crate::error::GeneratorError;

/// Native `fetch`. Query arrays repeat their key; JSON bodies are
/// stringified by hand and non-2xx responses throw.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchEmitter;

impl ClientEmitter for FetchEmitter {
    fn name(&self) -> &str {
        "fetch"
    }

    fn emit_header(&self) -> String {
        "// Generated with fetch".to_string()
    }

    fn query_array_style(&self) -> QueryArrayStyle {
        QueryArrayStyle::Repeat
    }

    fn emit_implementation(
        &self,
        op: &CanonicalOperation,
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        render_template("fetch.ts.j2", ImplementationContext::build(op, options))
    }
}
