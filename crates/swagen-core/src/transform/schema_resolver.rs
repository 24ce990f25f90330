use std::collections::HashSet;

use indexmap::IndexMap;

use crate::ir::{ObjectType, PrimitiveKind, ResolvedProperty, ResolvedType};
use crate::parse::definitions::DefinitionTable;
use crate::parse::schema::{RawSchemaNode, decoded_ref_name};

/// Resolve a raw schema node against a definition table.
///
/// `seen` holds definition names already being expanded on the current path;
/// a `$ref` to one of them resolves to [`ResolvedType::Unknown`].
pub fn resolve(
    node: Option<&RawSchemaNode>,
    table: &DefinitionTable,
    seen: &HashSet<String>,
) -> ResolvedType {
    let mut seen = seen.clone();
    SchemaResolver::new(table).resolve_with(node, &mut seen)
}

/// Expands raw schema nodes into reference-free [`ResolvedType`] trees.
///
/// Resolution never fails: missing references and reference cycles degrade to
/// `Unknown` at the point where they occur.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    table: &'a DefinitionTable,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(table: &'a DefinitionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a DefinitionTable {
        self.table
    }

    pub fn resolve(&self, node: Option<&RawSchemaNode>) -> ResolvedType {
        let mut seen = HashSet::new();
        self.resolve_with(node, &mut seen)
    }

    fn resolve_with(&self, node: Option<&RawSchemaNode>, seen: &mut HashSet<String>) -> ResolvedType {
        let Some(node) = node else {
            return ResolvedType::Unknown;
        };

        if let Some(reference) = &node.reference {
            return self.resolve_ref(reference, seen);
        }

        let type_name = node.type_name();

        if type_name == Some("array") {
            return ResolvedType::array(self.resolve_with(node.items.as_deref(), seen));
        }

        if type_name == Some("object") || !node.properties.is_empty() {
            let properties: IndexMap<String, ResolvedProperty> = node
                .properties
                .iter()
                .map(|(name, prop)| {
                    let ty = self.resolve_with(Some(prop), seen);
                    let required = node.required.iter().any(|r| r == name);
                    (name.clone(), ResolvedProperty::new(ty, required))
                })
                .collect();
            return ResolvedType::Object(ObjectType::anonymous(properties));
        }

        if let Some(values) = node.string_enum() {
            return ResolvedType::EnumOfString { values };
        }

        match type_name.and_then(PrimitiveKind::from_type_name) {
            Some(kind) => ResolvedType::Primitive {
                kind,
                format: node.format.clone(),
            },
            None => ResolvedType::Unknown,
        }
    }

    fn resolve_ref(&self, reference: &str, seen: &mut HashSet<String>) -> ResolvedType {
        let name = decoded_ref_name(reference);
        if seen.contains(&name) {
            log::trace!("cyclic reference to `{name}` cut off");
            return ResolvedType::Unknown;
        }
        let Some(target) = self.table.get(&name) else {
            log::warn!("unresolvable reference `{reference}`; treating as unknown");
            return ResolvedType::Unknown;
        };

        seen.insert(name.clone());
        let mut resolved = self.resolve_with(Some(target), seen);
        seen.remove(&name);

        if let ResolvedType::Object(obj) = &mut resolved
            && obj.name.is_none()
        {
            obj.name = Some(name);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(value: serde_json::Value) -> RawSchemaNode {
        serde_json::from_value(value).unwrap()
    }

    fn table(value: serde_json::Value) -> DefinitionTable {
        let map: IndexMap<String, RawSchemaNode> = serde_json::from_value(value).unwrap();
        map.into_iter().collect()
    }

    fn string() -> ResolvedType {
        ResolvedType::primitive(PrimitiveKind::String)
    }

    #[test]
    fn test_null_node_is_unknown() {
        let table = DefinitionTable::new();
        assert_eq!(resolve(None, &table, &HashSet::new()), ResolvedType::Unknown);
    }

    #[test]
    fn test_ref_round_trip() {
        let defs = table(json!({
            "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
        }));
        let resolved = resolve(
            Some(&node(json!({"$ref": "#/definitions/Pet"}))),
            &defs,
            &HashSet::new(),
        );

        let ResolvedType::Object(obj) = resolved else {
            panic!("expected object, got {resolved:?}");
        };
        assert_eq!(obj.name.as_deref(), Some("Pet"));
        assert_eq!(obj.properties.len(), 1);
        assert_eq!(obj.properties["name"], ResolvedProperty::new(string(), false));
    }

    #[test]
    fn test_components_ref_resolves_by_last_segment() {
        let defs = table(json!({"Id": {"type": "integer", "format": "int64"}}));
        let resolved = SchemaResolver::new(&defs)
            .resolve(Some(&node(json!({"$ref": "#/components/schemas/Id"}))));
        assert_eq!(
            resolved,
            ResolvedType::Primitive {
                kind: PrimitiveKind::Integer,
                format: Some("int64".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_ref_is_unknown() {
        let defs = DefinitionTable::new();
        let resolved = resolve(
            Some(&node(json!({"$ref": "#/definitions/Ghost"}))),
            &defs,
            &HashSet::new(),
        );
        assert_eq!(resolved, ResolvedType::Unknown);
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let defs = table(json!({
            "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
            "B": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}}
        }));
        let resolved = SchemaResolver::new(&defs).resolve(Some(&node(json!({"$ref": "#/definitions/A"}))));

        let ResolvedType::Object(a) = &resolved else {
            panic!("expected object");
        };
        let ResolvedType::Object(b) = &a.properties["b"].ty else {
            panic!("expected nested object");
        };
        assert_eq!(b.name.as_deref(), Some("B"));
        assert_eq!(b.properties["a"].ty, ResolvedType::Unknown);
        assert!(resolved.contains_unknown());
    }

    #[test]
    fn test_self_reference_through_array() {
        let defs = table(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}
                }
            }
        }));
        let resolved = SchemaResolver::new(&defs).resolve(Some(&node(json!({"$ref": "#/definitions/Node"}))));
        let ResolvedType::Object(obj) = resolved else {
            panic!("expected object");
        };
        assert_eq!(
            obj.properties["children"].ty,
            ResolvedType::array(ResolvedType::Unknown)
        );
    }

    #[test]
    fn test_sibling_refs_both_expand() {
        let defs = table(json!({
            "Category": {"type": "object", "properties": {"id": {"type": "integer"}}}
        }));
        let resolved = SchemaResolver::new(&defs).resolve(Some(&node(json!({
            "type": "object",
            "properties": {
                "primary": {"$ref": "#/definitions/Category"},
                "secondary": {"$ref": "#/definitions/Category"}
            }
        }))));
        let ResolvedType::Object(obj) = resolved else {
            panic!("expected object");
        };
        assert_eq!(obj.properties["primary"].ty, obj.properties["secondary"].ty);
        assert!(!obj.properties["secondary"].ty.contains_unknown());
    }

    #[test]
    fn test_required_membership() {
        let defs = DefinitionTable::new();
        let resolved = SchemaResolver::new(&defs).resolve(Some(&node(json!({
            "type": "object",
            "required": ["id"],
            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}}
        }))));
        let ResolvedType::Object(obj) = resolved else {
            panic!("expected object");
        };
        assert!(obj.properties["id"].required);
        assert!(!obj.properties["name"].required);
        assert_eq!(obj.name, None);
    }

    #[test]
    fn test_properties_without_type_is_object() {
        let defs = DefinitionTable::new();
        let resolved = SchemaResolver::new(&defs)
            .resolve(Some(&node(json!({"properties": {"x": {"type": "boolean"}}}))));
        assert!(matches!(resolved, ResolvedType::Object(_)));
    }

    #[test]
    fn test_enum_precedence() {
        let defs = DefinitionTable::new();
        let resolver = SchemaResolver::new(&defs);

        let string_enum = resolver.resolve(Some(&node(
            json!({"type": "string", "enum": ["placed", "approved"]}),
        )));
        assert_eq!(
            string_enum,
            ResolvedType::EnumOfString {
                values: vec!["placed".to_string(), "approved".to_string()],
            }
        );

        let numeric_enum = resolver.resolve(Some(&node(json!({"type": "integer", "enum": [1, 2]}))));
        assert_eq!(numeric_enum, ResolvedType::primitive(PrimitiveKind::Integer));
    }

    #[test]
    fn test_primitive_table() {
        let defs = DefinitionTable::new();
        let resolver = SchemaResolver::new(&defs);
        let cases = [
            ("string", ResolvedType::primitive(PrimitiveKind::String)),
            ("integer", ResolvedType::primitive(PrimitiveKind::Integer)),
            ("number", ResolvedType::primitive(PrimitiveKind::Number)),
            ("boolean", ResolvedType::primitive(PrimitiveKind::Boolean)),
            ("file", ResolvedType::primitive(PrimitiveKind::File)),
            ("null", ResolvedType::Unknown),
        ];
        for (name, expected) in cases {
            assert_eq!(resolver.resolve(Some(&RawSchemaNode::of_type(name))), expected, "{name}");
        }
        assert_eq!(resolver.resolve(Some(&RawSchemaNode::default())), ResolvedType::Unknown);
    }

    #[test]
    fn test_array_without_items() {
        let defs = DefinitionTable::new();
        let resolved = SchemaResolver::new(&defs).resolve(Some(&RawSchemaNode::of_type("array")));
        assert_eq!(resolved, ResolvedType::array(ResolvedType::Unknown));
    }

    #[test]
    fn test_resolution_is_deterministic_and_pure() {
        let defs = table(json!({
            "Pet": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string"},
                    "tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}},
                    "owner": {"$ref": "#/definitions/Ghost"}
                }
            },
            "Tag": {"type": "object", "properties": {"label": {"type": "string"}}}
        }));
        let before = defs.clone();
        let input = node(json!({"$ref": "#/definitions/Pet"}));

        let first = resolve(Some(&input), &defs, &HashSet::new());
        let second = resolve(Some(&input), &defs, &HashSet::new());
        assert_eq!(first, second);
        assert_eq!(defs, before);
    }

    #[test]
    fn test_seen_set_is_respected() {
        let defs = table(json!({"Pet": {"type": "object"}}));
        let seen: HashSet<String> = ["Pet".to_string()].into_iter().collect();
        let resolved = resolve(Some(&node(json!({"$ref": "#/definitions/Pet"}))), &defs, &seen);
        assert_eq!(resolved, ResolvedType::Unknown);
    }
}
