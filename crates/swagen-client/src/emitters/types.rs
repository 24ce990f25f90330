use std::collections::HashSet;

use indexmap::IndexMap;
use swagen_core::config::GenerationOptions;
use swagen_core::ir::{CanonicalOperation, ObjectType, ResolvedProperty, ResolvedType};
use swagen_core::transform::naming::to_case;

use super::operation_names;
use crate::type_mapper::{collect_named, declaration, member_line, property_key, resolved_type_to_ts};

/// Member name of a request parameter after `propertyNameCase` conversion.
pub fn parameter_member(wire_name: &str, options: &GenerationOptions) -> String {
    to_case(wire_name, options.property_name_case)
}

/// Keys of the parameter groups in a request interface.
const GROUP_KEYS: [&str; 5] = ["query", "headers", "cookies", "body", "formData"];

/// Member names for one parameter group, in declaration order.
///
/// A converted name that is already taken gets a numeric suffix
/// (`page_size` and `pageSize` become `pageSize` and `pageSize2`). Path
/// parameters are `top_level`: they share the interface with the group keys,
/// so a path parameter named like a group becomes e.g. `queryParam`.
pub fn member_names(
    params: &IndexMap<String, ResolvedProperty>,
    options: &GenerationOptions,
    top_level: bool,
) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    if top_level {
        taken.extend(GROUP_KEYS.iter().map(|key| key.to_string()));
    }
    params
        .keys()
        .map(|wire| {
            let converted = parameter_member(wire, options);
            let stem = if top_level && GROUP_KEYS.contains(&converted.as_str()) {
                format!("{converted}Param")
            } else {
                converted.clone()
            };
            let mut name = stem.clone();
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("{stem}{suffix}");
                suffix += 1;
            }
            if name != converted {
                log::warn!("parameter `{wire}` clashes with another member name; emitting it as `{name}`");
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Lines of the request interface body, indented by two spaces.
pub fn request_members(op: &CanonicalOperation, options: &GenerationOptions) -> Vec<String> {
    let model = &op.request_model;
    let mut lines = Vec::new();

    let path_names = member_names(&model.path, options, true);
    for (prop, name) in model.path.values().zip(&path_names) {
        let key = property_key(name);
        lines.push(member_line(&key, &ResolvedProperty::new(prop.ty.clone(), true), 2));
    }

    if !model.query.is_empty() {
        lines.push(group("query", &model.query, options));
    }
    if model.header.is_empty() {
        lines.push("  headers?: Record<string, string>;".to_string());
    } else {
        lines.push(group("headers", &model.header, options));
    }
    if !model.cookie.is_empty() {
        lines.push(group("cookies", &model.cookie, options));
    }
    if let Some(body) = &model.body {
        lines.push(format!(
            "  body{}: {};",
            if body.required { "" } else { "?" },
            resolved_type_to_ts(&body.resolved_type, 2)
        ));
    }
    if !model.form_data.is_empty() {
        lines.push(group("formData", &model.form_data, options));
    }

    lines
}

fn group(label: &str, members: &IndexMap<String, ResolvedProperty>, options: &GenerationOptions) -> String {
    let required = members.values().any(|p| p.required);
    let names = member_names(members, options, false);
    let lines: Vec<String> = members
        .values()
        .zip(&names)
        .map(|(prop, name)| member_line(&property_key(name), prop, 4))
        .collect();
    format!(
        "  {label}{}: {{\n{}\n  }};",
        if required { "" } else { "?" },
        lines.join("\n")
    )
}

/// The payload type of the first 2xx response, if it has one worth decoding.
pub fn success_data(op: &CanonicalOperation) -> Option<&ResolvedType> {
    op.success_response()
        .and_then(|(_, resp)| resp.resolved_type.as_ref())
        .filter(|ty| !ty.is_unknown())
}

/// Lines of the response envelope body, indented by two spaces.
pub fn response_members(op: &CanonicalOperation) -> Vec<String> {
    let data = success_data(op)
        .map(|ty| resolved_type_to_ts(ty, 2))
        .unwrap_or_else(|| "void".to_string());
    vec![
        format!("  data: {data};"),
        "  status: number;".to_string(),
        "  statusText: string;".to_string(),
        "  headers: Record<string, string>;".to_string(),
    ]
}

pub fn request_type(op: &CanonicalOperation, options: &GenerationOptions) -> String {
    let (_, interface) = operation_names(op, options);
    format!(
        "export interface {interface}Request {{\n{}\n}}",
        request_members(op, options).join("\n")
    )
}

pub fn response_type(op: &CanonicalOperation, options: &GenerationOptions) -> String {
    let (_, interface) = operation_names(op, options);
    format!(
        "export interface {interface}Response {{\n{}\n}}",
        response_members(op).join("\n")
    )
}

/// One declaration per named object reachable from the emitted request and
/// response types, in first-seen order.
pub fn model_declarations(ops: &[CanonicalOperation]) -> Vec<String> {
    let mut named: IndexMap<String, &ObjectType> = IndexMap::new();
    for op in ops {
        let model = &op.request_model;
        let groups = [&model.path, &model.query, &model.header, &model.cookie, &model.form_data];
        for prop in groups.into_iter().flat_map(|g| g.values()) {
            collect_named(&prop.ty, &mut named);
        }
        if let Some(body) = &model.body {
            collect_named(&body.resolved_type, &mut named);
        }
        if let Some(data) = success_data(op) {
            collect_named(data, &mut named);
        }
    }
    named
        .iter()
        .map(|(name, obj)| declaration(name, obj))
        .collect()
}
