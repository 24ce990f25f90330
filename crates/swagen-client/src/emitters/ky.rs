use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;

use super::{ClientEmitter, ImplementationContext, QueryArrayStyle, render_template};
use crate::error::GeneratorError;

/// ky with a `prefixUrl` instance; request paths are relative. Query arrays
/// are comma-joined into one value.
#[derive(Debug, Clone, Copy, Default)]
pub struct KyEmitter;

impl ClientEmitter for KyEmitter {
    fn name(&self) -> &str {
        "ky"
    }

    fn emit_header(&self) -> String {
        "// Generated with ky\nimport ky from 'ky';".to_string()
    }

    fn query_array_style(&self) -> QueryArrayStyle {
        QueryArrayStyle::Comma
    }

    fn client_setup(&self) -> Option<&'static str> {
        Some("const api = ky.create({\n  prefixUrl: API_BASE_URL,\n});")
    }

    fn emit_implementation(
        &self,
        op: &CanonicalOperation,
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        render_template("ky.ts.j2", ImplementationContext::build(op, options))
    }
}
