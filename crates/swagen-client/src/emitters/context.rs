use indexmap::IndexMap;
use serde::Serialize;
use swagen_core::config::GenerationOptions;
use swagen_core::ir::{CanonicalOperation, PrimitiveKind, ResolvedProperty, ResolvedType};

use super::operation_names;
use super::types::{member_names, success_data};
use crate::type_mapper::{escape_single_quoted, is_identifier};

/// Everything an implementation template needs to know about one operation.
#[derive(Debug, Clone, Serialize)]
pub struct ImplementationContext {
    /// `// METHOD path` line and/or JSDoc block, already formatted.
    pub preamble: String,
    pub function_name: String,
    pub interface_name: String,
    pub method: String,
    pub method_lower: String,
    /// Template-literal body of the request path with parameters substituted.
    pub url: String,
    /// `url` without its leading slash, for clients with a prefix URL.
    pub relative_url: String,
    pub query: Vec<Member>,
    pub headers: Vec<Member>,
    pub cookies: Vec<Member>,
    pub form: Vec<Member>,
    pub has_body: bool,
    pub returns_data: bool,
}

/// A request parameter as it appears on the wire and in the `params` object.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    /// Wire name, escaped for a single-quoted string.
    pub wire: String,
    /// Expression reading the value, e.g. `params.query?.petId`.
    pub expr: String,
    /// Whether the value is sent as-is rather than stringified.
    pub blob: bool,
}

impl ImplementationContext {
    pub fn build(op: &CanonicalOperation, options: &GenerationOptions) -> Self {
        let (function_name, interface_name) = operation_names(op, options);
        let model = &op.request_model;
        let url = path_template(&op.path, &model.path, options);

        Self {
            preamble: preamble(op, &interface_name, options),
            relative_url: url.trim_start_matches('/').to_string(),
            url,
            function_name,
            interface_name,
            method: op.method.clone(),
            method_lower: op.method.to_lowercase(),
            query: members("query", &model.query, options),
            headers: members("headers", &model.header, options),
            cookies: members("cookies", &model.cookie, options),
            form: members("formData", &model.form_data, options),
            has_body: model.body.is_some(),
            returns_data: success_data(op).is_some(),
        }
    }
}

/// Property access for a member name: `.name`, or `['name']` when the name is
/// not an identifier.
fn accessor(name: &str, optional: bool) -> String {
    match (is_identifier(name), optional) {
        (true, true) => format!("?.{name}"),
        (true, false) => format!(".{name}"),
        (false, true) => format!("?.['{}']", escape_single_quoted(name)),
        (false, false) => format!("['{}']", escape_single_quoted(name)),
    }
}

fn members(
    group: &str,
    params: &IndexMap<String, ResolvedProperty>,
    options: &GenerationOptions,
) -> Vec<Member> {
    let names = member_names(params, options, false);
    params
        .iter()
        .zip(&names)
        .map(|((wire, prop), name)| Member {
            wire: escape_single_quoted(wire),
            expr: format!("params.{group}{}", accessor(name, true)),
            blob: is_blob(&prop.ty),
        })
        .collect()
}

fn is_blob(ty: &ResolvedType) -> bool {
    match ty {
        ResolvedType::Primitive { kind: PrimitiveKind::File, .. } => true,
        ResolvedType::Primitive { kind: PrimitiveKind::String, format } => {
            format.as_deref() == Some("binary")
        }
        _ => false,
    }
}

/// Turn `/pets/{petId}` into the body of a template literal that encodes each
/// declared path parameter. Placeholders without a matching parameter are
/// kept as written.
fn path_template(
    path: &str,
    params: &IndexMap<String, ResolvedProperty>,
    options: &GenerationOptions,
) -> String {
    let names = member_names(params, options, true);
    let mut out = String::with_capacity(path.len() + 32);
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        push_literal(&mut out, &rest[..open]);
        let name = &rest[open + 1..close];
        if let Some(index) = params.get_index_of(name) {
            out.push_str(&format!(
                "${{encodeURIComponent(String(params{}))}}",
                accessor(&names[index], false)
            ));
        } else {
            push_literal(&mut out, &rest[open..=close]);
        }
        rest = &rest[close + 1..];
    }
    push_literal(&mut out, rest);
    out
}

/// Append text to a template literal body, escaping what would end it or
/// start an interpolation.
fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
}

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

fn preamble(op: &CanonicalOperation, interface_name: &str, options: &GenerationOptions) -> String {
    let mut lines = Vec::new();
    if options.include_comments {
        lines.push(format!("// {} {}", op.method, op.path));
    }
    if options.include_jsdoc {
        let mut doc: Vec<String> = Vec::new();
        if !op.summary.is_empty() {
            doc.push(op.summary.clone());
        }
        if let Some(description) = op
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty() && *d != op.summary)
        {
            if !doc.is_empty() {
                doc.push(String::new());
            }
            doc.extend(description.lines().map(|l| l.trim_end().to_string()));
        }
        if !doc.is_empty() {
            doc.push(String::new());
        }
        doc.push(format!("@param params - {interface_name}Request"));
        doc.push(format!("@returns {interface_name}Response"));
        if op.deprecated {
            doc.push("@deprecated".to_string());
        }

        lines.push("/**".to_string());
        lines.extend(doc.iter().map(|line| {
            if line.is_empty() {
                " *".to_string()
            } else {
                format!(" * {}", escape_jsdoc(line))
            }
        }));
        lines.push(" */".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use swagen_core::ir::{CanonicalOperation, RequestModel};
    use swagen_core::transform::naming::NameCase;

    use super::*;

    fn op(path: &str) -> CanonicalOperation {
        CanonicalOperation {
            id: "getPet".into(),
            operation_id: Some("getPet".into()),
            path: path.into(),
            method: "GET".into(),
            summary: "Find pet */ by id".into(),
            description: Some("Returns one pet.".into()),
            tags: vec![],
            deprecated: true,
            parameters: vec![],
            request_model: RequestModel::default(),
            responses_by_status: IndexMap::new(),
        }
    }

    fn path_params(names: &[&str]) -> IndexMap<String, ResolvedProperty> {
        names
            .iter()
            .map(|n| {
                (
                    n.to_string(),
                    ResolvedProperty::new(ResolvedType::primitive(PrimitiveKind::String), true),
                )
            })
            .collect()
    }

    #[test]
    fn test_path_template_encodes_params() {
        let options = GenerationOptions::default();
        assert_eq!(
            path_template("/pet/{pet_id}/photos/{other}", &path_params(&["pet_id"]), &options),
            "/pet/${encodeURIComponent(String(params.petId))}/photos/{other}"
        );
    }

    #[test]
    fn test_path_template_escapes_literals() {
        let options = GenerationOptions::default();
        assert_eq!(
            path_template("/a`b/${x}", &IndexMap::new(), &options),
            "/a\\`b/\\${x}"
        );
    }

    #[test]
    fn test_path_template_renames_group_keys() {
        let options = GenerationOptions::default();
        assert_eq!(
            path_template("/search/{query}/{body}", &path_params(&["query", "body"]), &options),
            "/search/${encodeURIComponent(String(params.queryParam))}/${encodeURIComponent(String(params.bodyParam))}"
        );
    }

    #[test]
    fn test_colliding_members_read_their_own_values() {
        let options = GenerationOptions::default();
        let members = members("query", &path_params(&["page_size", "pageSize"]), &options);
        assert_eq!(members[0].wire, "page_size");
        assert_eq!(members[0].expr, "params.query?.pageSize");
        assert_eq!(members[1].wire, "pageSize");
        assert_eq!(members[1].expr, "params.query?.pageSize2");
    }

    #[test]
    fn test_accessor() {
        assert_eq!(accessor("petId", true), "?.petId");
        assert_eq!(accessor("2fa", false), "['2fa']");
    }

    #[test]
    fn test_members_use_property_case() {
        let options = GenerationOptions {
            property_name_case: NameCase::PascalCase,
            ..GenerationOptions::default()
        };
        let members = members("headers", &path_params(&["x-request-id"]), &options);
        assert_eq!(members[0].wire, "x-request-id");
        assert_eq!(members[0].expr, "params.headers?.XRequestId");
        assert!(!members[0].blob);
    }

    #[test]
    fn test_preamble_comment_only_by_default() {
        let options = GenerationOptions::default();
        assert_eq!(preamble(&op("/pets/{id}"), "GetPet", &options), "// GET /pets/{id}");
    }

    #[test]
    fn test_preamble_jsdoc() {
        let options = GenerationOptions {
            include_comments: false,
            include_jsdoc: true,
            ..GenerationOptions::default()
        };
        assert_eq!(
            preamble(&op("/pets/{id}"), "GetPet", &options),
            "/**\n * Find pet *\\/ by id\n *\n * Returns one pet.\n *\n * @param params - GetPetRequest\n * @returns GetPetResponse\n * @deprecated\n */"
        );
    }
}
