use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::transform::naming::NameCase;

/// Naming and formatting preferences for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub function_name_case: NameCase,
    /// Accepted for compatibility; interface names are always PascalCase.
    pub interface_name_case: NameCase,
    pub property_name_case: NameCase,
    pub include_comments: bool,
    #[serde(rename = "includeJSDoc", alias = "includeJsDoc")]
    pub include_jsdoc: bool,
    pub export_as_default: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            function_name_case: NameCase::CamelCase,
            interface_name_case: NameCase::PascalCase,
            property_name_case: NameCase::CamelCase,
            include_comments: true,
            include_jsdoc: false,
            export_as_default: false,
        }
    }
}

/// Top-level project configuration loaded from `.swagen.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwagenConfig {
    pub input: String,
    /// Output file; generated code goes to stdout when unset.
    pub output: Option<PathBuf>,
    pub convention: String,
    /// Built-in template name or saved template id.
    pub template: Option<String>,
    pub templates_file: PathBuf,
    pub options: GenerationOptions,
}

impl Default for SwagenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: None,
            convention: "fetch".to_string(),
            template: None,
            templates_file: PathBuf::from(TEMPLATES_FILE_NAME),
            options: GenerationOptions::default(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swagen.yaml";

/// Default saved-template store file name.
pub const TEMPLATES_FILE_NAME: &str = ".swagen-templates.json";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwagenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SwagenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swagen configuration
input: openapi.yaml
# output: src/api.ts          # stdout when unset
convention: fetch             # fetch | axios | ky | superagent
# template: reactQuery        # built-in template name or saved template id
templates_file: .swagen-templates.json

options:
  functionNameCase: camelCase   # camelCase | PascalCase
  interfaceNameCase: PascalCase # interface names are always PascalCase
  propertyNameCase: camelCase   # request parameter member names
  includeComments: true
  includeJSDoc: false
  exportAsDefault: false
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SwagenConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.output, None);
        assert_eq!(config.convention, "fetch");
        assert_eq!(config.template, None);
        assert_eq!(config.templates_file, PathBuf::from(".swagen-templates.json"));
        assert_eq!(config.options, GenerationOptions::default());
    }

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.function_name_case, NameCase::CamelCase);
        assert_eq!(options.interface_name_case, NameCase::PascalCase);
        assert_eq!(options.property_name_case, NameCase::CamelCase);
        assert!(options.include_comments);
        assert!(!options.include_jsdoc);
        assert!(!options.export_as_default);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: petstore.json
output: out/api.ts
convention: axios
template: swr
options:
  functionNameCase: PascalCase
  includeJSDoc: true
  exportAsDefault: true
"#;
        let config: SwagenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "petstore.json");
        assert_eq!(config.output, Some(PathBuf::from("out/api.ts")));
        assert_eq!(config.convention, "axios");
        assert_eq!(config.template.as_deref(), Some("swr"));
        assert_eq!(config.options.function_name_case, NameCase::PascalCase);
        assert!(config.options.include_jsdoc);
        assert!(config.options.export_as_default);
        // unset options keep their defaults
        assert!(config.options.include_comments);
        assert_eq!(config.options.property_name_case, NameCase::CamelCase);
    }

    #[test]
    fn test_options_accept_snake_case_values() {
        let options: GenerationOptions =
            serde_json::from_str(r#"{"propertyNameCase": "pascal_case"}"#).unwrap();
        assert_eq!(options.property_name_case, NameCase::PascalCase);
    }

    #[test]
    fn test_default_config_content_parses() {
        let config: SwagenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, SwagenConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "convention: ky\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.convention, "ky");
        assert_eq!(config.input, "openapi.yaml");
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "convention: [fetch, axios]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }
}
