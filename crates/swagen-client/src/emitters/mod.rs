pub mod axios;
pub mod context;
pub mod fetch;
pub mod ky;
pub mod superagent;
pub mod types;

use std::collections::HashSet;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use swagen_core::config::GenerationOptions;
use swagen_core::ir::CanonicalOperation;
use swagen_core::transform::naming::{function_name, interface_name};

use crate::error::GeneratorError;

pub use axios::AxiosEmitter;
pub use context::ImplementationContext;
pub use fetch::FetchEmitter;
pub use ky::KyEmitter;
pub use superagent::SuperagentEmitter;

/// How a convention serializes array-valued query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryArrayStyle {
    /// `k=a&k=b`
    Repeat,
    /// `k[]=a&k[]=b`
    Brackets,
    /// `k=a,b`
    Comma,
}

impl QueryArrayStyle {
    pub fn example(&self) -> &'static str {
        match self {
            QueryArrayStyle::Repeat => "k=a&k=b",
            QueryArrayStyle::Brackets => "k[]=a&k[]=b",
            QueryArrayStyle::Comma => "k=a,b",
        }
    }
}

/// One calling convention for the generated client code.
///
/// Every method takes the options explicitly; emitters hold no per-call state.
pub trait ClientEmitter: Send + Sync {
    fn name(&self) -> &str;

    /// Import/setup text placed at the top of the generated source.
    fn emit_header(&self) -> String;

    fn query_array_style(&self) -> QueryArrayStyle;

    /// Client instance created after the base URL block, if the convention
    /// needs one.
    fn client_setup(&self) -> Option<&'static str> {
        None
    }

    fn emit_implementation(
        &self,
        op: &CanonicalOperation,
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError>;

    fn emit_config(&self, options: &GenerationOptions) -> String {
        let mut config = base_url_config(options);
        if let Some(setup) = self.client_setup() {
            config.push_str("\n\n");
            config.push_str(setup);
        }
        config
    }

    fn emit_request_type(&self, op: &CanonicalOperation, options: &GenerationOptions) -> String {
        types::request_type(op, options)
    }

    fn emit_response_type(&self, op: &CanonicalOperation, options: &GenerationOptions) -> String {
        types::response_type(op, options)
    }

    /// Header, config, model declarations, one request/response pair per
    /// distinct interface name, then every implementation, separated by
    /// blank lines.
    fn emit_full_source(
        &self,
        ops: &[CanonicalOperation],
        options: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        let mut sections = vec![self.emit_header(), self.emit_config(options)];
        sections.extend(types::model_declarations(ops));

        let mut defined = HashSet::new();
        for op in ops {
            let (_, interface) = operation_names(op, options);
            if defined.insert(interface.clone()) {
                sections.push(self.emit_request_type(op, options));
                sections.push(self.emit_response_type(op, options));
            } else {
                log::warn!(
                    "{} {}: interface name `{interface}` already generated; reusing the first declaration",
                    op.method,
                    op.path
                );
            }
        }

        for op in ops {
            sections.push(self.emit_implementation(op, options)?);
        }

        if options.export_as_default {
            sections.push(default_export(ops, options));
        }

        let mut source = sections.join("\n\n");
        source.push('\n');
        Ok(source)
    }
}

/// Function name and PascalCase interface stem of an operation.
pub fn operation_names(op: &CanonicalOperation, options: &GenerationOptions) -> (String, String) {
    let function = function_name(
        &op.method,
        &op.path,
        op.operation_id.as_deref(),
        options.function_name_case,
    );
    let interface = interface_name(&function);
    (function, interface)
}

/// The `API_BASE_URL` resolution block, with its explanatory comment when
/// `includeComments` is set.
pub fn base_url_config(options: &GenerationOptions) -> String {
    let mut config = String::new();
    if options.include_comments {
        config.push_str(BASE_URL_COMMENT);
    }
    config.push_str(BASE_URL_BLOCK);
    config
}

fn default_export(ops: &[CanonicalOperation], options: &GenerationOptions) -> String {
    let mut seen = HashSet::new();
    let names: Vec<String> = ops
        .iter()
        .map(|op| operation_names(op, options).0)
        .filter(|name| seen.insert(name.clone()))
        .collect();
    format!("export default {{ {} }};", names.join(", "))
}

const BASE_URL_COMMENT: &str = "\
// API configuration
// The base URL comes from the first of NEXT_PUBLIC_API_BASE_URL (Next.js),
// VITE_API_BASE_URL (Vite), REACT_APP_API_BASE_URL (Create React App) or
// API_BASE_URL (Node.js) that is set, else from window.API_BASE_URL.
";

const BASE_URL_BLOCK: &str = "\
const API_BASE_URL: string = (() => {
  if (typeof process !== 'undefined' && process.env) {
    return (
      process.env.NEXT_PUBLIC_API_BASE_URL ||
      process.env.VITE_API_BASE_URL ||
      process.env.REACT_APP_API_BASE_URL ||
      process.env.API_BASE_URL ||
      ''
    );
  }
  if (typeof window !== 'undefined' && (window as any).API_BASE_URL) {
    return (window as any).API_BASE_URL;
  }
  return '';
})();";

const TEMPLATES: &[(&str, &str)] = &[
    ("_preamble.ts.j2", include_str!("../../templates/_preamble.ts.j2")),
    ("_query.ts.j2", include_str!("../../templates/_query.ts.j2")),
    ("_headers.ts.j2", include_str!("../../templates/_headers.ts.j2")),
    ("_form.ts.j2", include_str!("../../templates/_form.ts.j2")),
    ("fetch.ts.j2", include_str!("../../templates/fetch.ts.j2")),
    ("axios.ts.j2", include_str!("../../templates/axios.ts.j2")),
    ("ky.ts.j2", include_str!("../../templates/ky.ts.j2")),
    ("superagent.ts.j2", include_str!("../../templates/superagent.ts.j2")),
];

/// Render one of the embedded implementation templates.
pub(crate) fn render_template<S: Serialize>(name: &str, ctx: S) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    for (template_name, source) in TEMPLATES {
        env.add_template(template_name, source)?;
    }
    let rendered = env.get_template(name)?.render(ctx)?;
    Ok(rendered.trim_end().to_string())
}

#[cfg(test)]
mod tests;
