use indexmap::IndexMap;
use serde::Serialize;

/// Primitive kinds a schema can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
    File,
}

impl PrimitiveKind {
    /// Map a raw `type` keyword onto a primitive kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveKind::String),
            "integer" => Some(PrimitiveKind::Integer),
            "number" => Some(PrimitiveKind::Number),
            "boolean" => Some(PrimitiveKind::Boolean),
            "file" => Some(PrimitiveKind::File),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, PrimitiveKind::Integer | PrimitiveKind::Number)
    }
}

/// The reference-free, recursively expanded form of a raw schema node.
///
/// A `ResolvedType` never contains a `$ref`. Objects reached through a `$ref`
/// are still fully expanded; they only remember the definition name they came
/// from so that emitters can declare and reference them by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedType {
    Primitive {
        #[serde(rename = "type")]
        kind: PrimitiveKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    EnumOfString {
        values: Vec<String>,
    },
    Array {
        items: Box<ResolvedType>,
    },
    Object(ObjectType),
    Unknown,
}

impl ResolvedType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        ResolvedType::Primitive { kind, format: None }
    }

    pub fn array(items: ResolvedType) -> Self {
        ResolvedType::Array {
            items: Box::new(items),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Unknown)
    }

    /// Whether `Unknown` appears anywhere in the tree.
    pub fn contains_unknown(&self) -> bool {
        match self {
            ResolvedType::Unknown => true,
            ResolvedType::Array { items } => items.contains_unknown(),
            ResolvedType::Object(obj) => obj.properties.values().any(|p| p.ty.contains_unknown()),
            ResolvedType::Primitive { .. } | ResolvedType::EnumOfString { .. } => false,
        }
    }
}

/// An object shape with ordered properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectType {
    /// Definition name this object was resolved from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: IndexMap<String, ResolvedProperty>,
}

impl ObjectType {
    pub fn anonymous(properties: IndexMap<String, ResolvedProperty>) -> Self {
        Self {
            name: None,
            properties,
        }
    }
}

/// A property of a resolved object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperty {
    #[serde(rename = "type")]
    pub ty: ResolvedType,
    pub required: bool,
}

impl ResolvedProperty {
    pub fn new(ty: ResolvedType, required: bool) -> Self {
        Self { ty, required }
    }
}
