//! Placeholder substitution for user-authored and built-in templates.
//!
//! A template is plain text with `{{token}}` placeholders. Each operation
//! renders the whole template once; renders are joined by a blank line.
//! Substitution is a single left-to-right pass, so inserted text is never
//! scanned again, and unknown tokens are kept verbatim.
//!
//! Rendered operations reference `API_BASE_URL` and named models without
//! declaring them; [`prelude`] supplies those declarations once per file.

use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;

use crate::emitters::{base_url_config, operation_names, types};
use crate::error::GeneratorError;
use crate::registry::EmitterRegistry;

/// Built-in templates by name.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("basic", BASIC),
    ("reactQuery", REACT_QUERY),
    ("swr", SWR),
    ("superagent", SUPERAGENT),
];

pub fn builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}

const BASIC: &str = "\
// {{summary}}
export interface {{functionName}}Request {
{{requestInterface}}
}

export interface {{functionName}}Response {
{{responseInterface}}
}

export const {{functionName}} = async (params: {{functionName}}Request): Promise<{{functionName}}Response> => {
  // {{method}} {{path}}
  throw new Error('not implemented');
};";

const REACT_QUERY: &str = "\
// {{summary}} (React Query)
import { useQuery } from '@tanstack/react-query';

export interface {{functionName}}Request {
{{requestInterface}}
}

export const {{functionName}} = async (params: {{functionName}}Request) => {
  // {{method}} {{path}}
};

export const use{{functionName}} = (params: {{functionName}}Request) =>
  useQuery({ queryKey: ['{{operationId}}', params], queryFn: () => {{functionName}}(params) });";

const SWR: &str = "\
// {{summary}} (SWR)
import useSWR from 'swr';

export interface {{functionName}}Request {
{{requestInterface}}
}

export const {{functionName}} = async (params: {{functionName}}Request) => {
  // {{method}} {{path}}
};

export const use{{functionName}} = (params: {{functionName}}Request) =>
  useSWR(['{{operationId}}', params], () => {{functionName}}(params));";

const SUPERAGENT: &str = "\
// {{summary}} (SuperAgent)
import request from 'superagent';

export interface {{functionName}}Request {
{{requestInterface}}
}

export interface {{functionName}}Response {
{{responseInterface}}
}

{{superagentImplementation}}";

/// Supplies the generated fragments a template can reference.
pub trait FragmentProvider {
    /// PascalCase name substituted for `{{functionName}}`.
    fn function_name(&self, op: &CanonicalOperation) -> String;

    /// Body of the request interface, without the surrounding declaration.
    fn request_interface(&self, op: &CanonicalOperation) -> String;

    /// Body of the response interface, without the surrounding declaration.
    fn response_interface(&self, op: &CanonicalOperation) -> String;

    /// Implementation under the named convention, `None` if there is no such
    /// convention.
    fn implementation(
        &self,
        convention: &str,
        op: &CanonicalOperation,
    ) -> Result<Option<String>, GeneratorError>;
}

/// Fragments produced by the emitters of a registry.
#[derive(Debug)]
pub struct EmitterFragments<'a> {
    registry: &'a EmitterRegistry,
    options: GenerationOptions,
}

impl<'a> EmitterFragments<'a> {
    pub fn new(registry: &'a EmitterRegistry, options: GenerationOptions) -> Self {
        Self { registry, options }
    }
}

impl FragmentProvider for EmitterFragments<'_> {
    fn function_name(&self, op: &CanonicalOperation) -> String {
        operation_names(op, &self.options).1
    }

    fn request_interface(&self, op: &CanonicalOperation) -> String {
        types::request_members(op, &self.options).join("\n")
    }

    fn response_interface(&self, op: &CanonicalOperation) -> String {
        types::response_members(op).join("\n")
    }

    fn implementation(
        &self,
        convention: &str,
        op: &CanonicalOperation,
    ) -> Result<Option<String>, GeneratorError> {
        if !self.registry.contains(convention) {
            return Ok(None);
        }
        let emitter = self.registry.get(convention)?;
        emitter.emit_implementation(op, &self.options).map(Some)
    }
}

/// Declarations shared by every rendered operation: the base URL block and
/// one declaration per named model.
pub fn prelude(ops: &[CanonicalOperation], options: &GenerationOptions) -> String {
    let mut sections = vec![base_url_config(options)];
    sections.extend(types::model_declarations(ops));
    sections.join("\n\n")
}

const IMPLEMENTATION_SUFFIX: &str = "Implementation";

/// Render `template` once per operation and join the results with a blank line.
pub fn render(
    ops: &[CanonicalOperation],
    template: &str,
    provider: &dyn FragmentProvider,
) -> Result<String, GeneratorError> {
    let rendered = ops
        .iter()
        .map(|op| render_operation(op, template, provider))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n\n"))
}

fn render_operation(
    op: &CanonicalOperation,
    template: &str,
    provider: &dyn FragmentProvider,
) -> Result<String, GeneratorError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        match substitute(&after[..end], op, provider)? {
            Some(value) => {
                out.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                // Keep one brace and rescan, so `{{{{method}}` still finds its token.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn substitute(
    token: &str,
    op: &CanonicalOperation,
    provider: &dyn FragmentProvider,
) -> Result<Option<String>, GeneratorError> {
    let value = match token {
        "functionName" => provider.function_name(op),
        "method" => op.method.clone(),
        "path" => op.path.clone(),
        "summary" => op.summary.clone(),
        "description" => op.description.clone().unwrap_or_default(),
        "operationId" => op.operation_id.clone().unwrap_or_else(|| op.id.clone()),
        "requestInterface" => provider.request_interface(op),
        "responseInterface" => provider.response_interface(op),
        "parameters" => serde_json::to_string_pretty(&op.parameters)?,
        "tags" => op.tags.join(", "),
        _ => match token.strip_suffix(IMPLEMENTATION_SUFFIX) {
            Some(convention) if !convention.is_empty() => {
                return provider.implementation(convention, op);
            }
            _ => return Ok(None),
        },
    };
    Ok(Some(value))
}
