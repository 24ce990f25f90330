use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;

use super::{ClientEmitter, ImplementationContext, QueryArrayStyle, render_template};
use crate::error::GeneratorError;

/// axios through a shared instance. Query parameters go through axios'
/// default serializer, which writes arrays in bracket notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxiosEmitter;

impl ClientEmitter for AxiosEmitter {
    fn name(&self) -> &str {
        "axios"
    }

    fn emit_header(&self) -> String {
        "// Generated with axios\nimport axios from 'axios';".to_string()
    }

    fn query_array_style(&self) -> QueryArrayStyle {
        QueryArrayStyle::Brackets
    }

    fn client_setup(&self) -> Option<&'static str> {
        Some("const api = axios.create({\n  baseURL: API_BASE_URL,\n});")
    }

    fn emit_implementation(
        &self,
        op: &CanonicalOperation,
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        render_template("axios.ts.j2", ImplementationContext::build(op, options))
    }
}
