use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;

use super::{ClientEmitter, ImplementationContext, QueryArrayStyle, render_template};
use crate::error::GeneratorError;

/// superagent request builder. Query arrays repeat their key; files are
/// attached and other form fields sent as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperagentEmitter;

impl ClientEmitter for SuperagentEmitter {
    fn name(&self) -> &str {
        "superagent"
    }

    fn emit_header(&self) -> String {
        "// Generated with superagent\nimport request from 'superagent';".to_string()
    }

    fn query_array_style(&self) -> QueryArrayStyle {
        QueryArrayStyle::Repeat
    }

    fn emit_implementation(
        &self,
        op: &CanonicalOperation,
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        render_template("superagent.ts.j2", ImplementationContext::build(op, options))
    }
}
