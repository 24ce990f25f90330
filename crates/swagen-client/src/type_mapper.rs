use indexmap::IndexMap;
use swagen_core::ir::{ObjectType, PrimitiveKind, ResolvedProperty, ResolvedType};

/// Map a `ResolvedType` to its TypeScript type string.
///
/// `indent` is the indentation of the line the type starts on; inline object
/// members are placed two spaces deeper and the closing brace at `indent`.
/// Objects carrying a definition name are referenced by that name.
pub fn resolved_type_to_ts(ty: &ResolvedType, indent: usize) -> String {
    match ty {
        ResolvedType::Unknown => "any".to_string(),
        ResolvedType::Primitive { kind, format } => match kind {
            PrimitiveKind::String if format.as_deref() == Some("binary") => "Blob".to_string(),
            PrimitiveKind::String => "string".to_string(),
            PrimitiveKind::Integer | PrimitiveKind::Number => "number".to_string(),
            PrimitiveKind::Boolean => "boolean".to_string(),
            PrimitiveKind::File => "File".to_string(),
        },
        ResolvedType::EnumOfString { values } => {
            if values.is_empty() {
                return "string".to_string();
            }
            values
                .iter()
                .map(|v| format!("'{}'", escape_single_quoted(v)))
                .collect::<Vec<_>>()
                .join(" | ")
        }
        ResolvedType::Array { items } => {
            let inner = resolved_type_to_ts(items, indent);
            match items.as_ref() {
                ResolvedType::EnumOfString { values } if values.len() > 1 => format!("({inner})[]"),
                _ => format!("{inner}[]"),
            }
        }
        ResolvedType::Object(obj) => match &obj.name {
            Some(name) => declaration_name(name),
            None if obj.properties.is_empty() => "Record<string, any>".to_string(),
            None => {
                let members = object_members(&obj.properties, indent + 2);
                format!("{{\n{}\n{}}}", members.join("\n"), " ".repeat(indent))
            }
        },
    }
}

/// One `key?: type;` line per property, indented by `indent` spaces.
pub fn object_members(properties: &IndexMap<String, ResolvedProperty>, indent: usize) -> Vec<String> {
    properties
        .iter()
        .map(|(name, prop)| member_line(&property_key(name), prop, indent))
        .collect()
}

pub fn member_line(key: &str, prop: &ResolvedProperty, indent: usize) -> String {
    format!(
        "{}{}{}: {};",
        " ".repeat(indent),
        key,
        if prop.required { "" } else { "?" },
        resolved_type_to_ts(&prop.ty, indent)
    )
}

/// `export interface Name { ... }` for a named object.
pub fn declaration(name: &str, obj: &ObjectType) -> String {
    let name = declaration_name(name);
    if obj.properties.is_empty() {
        return format!("export type {name} = Record<string, any>;");
    }
    format!(
        "export interface {name} {{\n{}\n}}",
        object_members(&obj.properties, 2).join("\n")
    )
}

/// Collect every named object reachable from `ty`, in first-seen order.
/// A name seen twice keeps its first shape.
pub fn collect_named<'a>(ty: &'a ResolvedType, out: &mut IndexMap<String, &'a ObjectType>) {
    match ty {
        ResolvedType::Array { items } => collect_named(items, out),
        ResolvedType::Object(obj) => {
            if let Some(name) = &obj.name {
                if out.contains_key(name) {
                    return;
                }
                out.insert(name.clone(), obj);
            }
            for prop in obj.properties.values() {
                collect_named(&prop.ty, out);
            }
        }
        ResolvedType::Primitive { .. } | ResolvedType::EnumOfString { .. } | ResolvedType::Unknown => {}
    }
}

/// A definition name usable as a TypeScript type name: characters outside
/// `[A-Za-z0-9_$]` are dropped (`List«Pet»` becomes `ListPet`).
pub fn declaration_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Property key as written in a type literal, quoted when it is not an
/// identifier (`'content-type'`).
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", escape_single_quoted(name))
    }
}

/// Escape text for a single-quoted JavaScript string literal.
pub fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
