use heck::{ToLowerCamelCase, ToPascalCase};
use serde::{Deserialize, Serialize};

/// Casing applied to generated identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameCase {
    #[default]
    #[serde(rename = "camelCase", alias = "camel_case")]
    CamelCase,
    #[serde(rename = "PascalCase", alias = "pascal_case")]
    PascalCase,
}

impl NameCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameCase::CamelCase => "camelCase",
            NameCase::PascalCase => "PascalCase",
        }
    }
}

/// Convert an arbitrary string to the requested case. Every character outside
/// `[A-Za-z0-9]` is treated as a word boundary and dropped.
pub fn to_case(raw: &str, case: NameCase) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    match case {
        NameCase::CamelCase => cleaned.to_lower_camel_case(),
        NameCase::PascalCase => cleaned.to_pascal_case(),
    }
}

/// Derive a function name for an operation.
///
/// A non-empty `operationId` is case-converted directly. Otherwise the
/// lower-cased method is joined with every non-empty path segment (braces
/// stripped) and the phrase is case-converted:
///
/// - `get /pet/{petId}` → `getPetPetId`
/// - `post /store/order` → `postStoreOrder`
pub fn function_name(method: &str, path: &str, operation_id: Option<&str>, case: NameCase) -> String {
    if let Some(id) = operation_id.filter(|id| !id.trim().is_empty()) {
        return to_case(id, case);
    }

    let mut words = vec![method.to_lowercase()];
    words.extend(
        path.split('/')
            .map(|segment| segment.replace(['{', '}'], ""))
            .filter(|segment| !segment.is_empty()),
    );
    to_case(&words.join(" "), case)
}

/// Type names are always PascalCase, whatever casing functions use.
pub fn interface_name(function_name: &str) -> String {
    to_case(function_name, NameCase::PascalCase)
}
