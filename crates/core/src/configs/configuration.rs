use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::configs::tasks::RawTaskDefinition;
use crate::types::{ApexError, ApexResult};

/// Default configuration file name searched for by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "apex.yaml";

/// One document of an `apex.yaml` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Path of the specification handed to code generators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    /// Free-form values, exposed to tasks as `apex_config_*` variables
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub config: IndexMap<String, Value>,
    /// Plugin module references, in the order they run
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub plugins: Vec<String>,
    /// Output path -> generator target
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub generates: IndexMap<String, Option<Target>>,
    /// Raw task keys (possibly carrying `name > deps` shorthand) -> definitions
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub tasks: IndexMap<String, Option<RawTaskDefinition>>,
}

/// A code generation target. Opaque to the task engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_not_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_after: Option<Vec<RunAfterCommand>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunAfterCommand {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse every YAML document in `yaml_str`. Empty documents are skipped.
pub fn parse_config_yaml(yaml_str: &str) -> ApexResult<Vec<Configuration>> {
    let mut configs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml_str) {
        if let Some(config) = Option::<Configuration>::deserialize(document)? {
            configs.push(config);
        }
    }
    Ok(configs)
}

/// Read and parse a configuration file
pub fn load_config_file(path: &Path) -> ApexResult<Vec<Configuration>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ApexError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    parse_config_yaml(&content).map_err(|e| {
        ApexError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

/// Look for `file_name` in `start_dir` and then in each of its ancestors.
pub fn find_config_file(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::tasks::TaskDefinition;

    #[test]
    fn test_parse_single_document() {
        let configs = parse_config_yaml(
            r#"
spec: spec.axdl
config:
  package: example
  version: 3
plugins:
  - ./plugin.ts
generates:
  src/lib.rs:
    module: rust.ts
    visitorClass: RustBasic
tasks:
  build:
    - cargo build
  "test > build":
    description: Run tests
    cmds: [cargo test]
"#,
        )
        .unwrap();

        assert_eq!(configs.len(), 1);
        let config = &configs[0];
        assert_eq!(config.spec.as_deref(), Some("spec.axdl"));
        assert_eq!(config.config["package"], Value::from("example"));
        assert_eq!(config.config["version"], Value::from(3));
        assert_eq!(config.plugins, vec!["./plugin.ts".to_string()]);

        let target = config.generates["src/lib.rs"].as_ref().unwrap();
        assert_eq!(target.module, "rust.ts");
        assert_eq!(target.visitor_class.as_deref(), Some("RustBasic"));

        let keys: Vec<_> = config.tasks.keys().cloned().collect();
        assert_eq!(keys, vec!["build".to_string(), "test > build".to_string()]);
        assert_eq!(
            config.tasks["test > build"],
            Some(RawTaskDefinition::Definition(TaskDefinition {
                description: Some("Run tests".to_string()),
                cmds: Some(vec!["cargo test".to_string()]),
                deps: None,
                runner: None,
            }))
        );
    }

    #[test]
    fn test_parse_multiple_documents_skips_empty_ones() {
        let configs = parse_config_yaml(
            "spec: one.axdl\n---\n---\nspec: two.axdl\ntasks:\n  dep:\n",
        )
        .unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].spec.as_deref(), Some("one.axdl"));
        assert_eq!(configs[1].spec.as_deref(), Some("two.axdl"));
        assert_eq!(configs[1].tasks["dep"], None);
    }

    #[test]
    fn test_null_sections_default_to_empty() {
        let configs = parse_config_yaml("config:\ntasks:\ngenerates:\n").unwrap();
        assert!(configs[0].config.is_empty());
        assert!(configs[0].tasks.is_empty());
        assert!(configs[0].generates.is_empty());
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(DEFAULT_CONFIG_FILE), "tasks: {}\n").unwrap();

        let found = find_config_file(&nested, DEFAULT_CONFIG_FILE).unwrap();
        assert_eq!(found, root.join(DEFAULT_CONFIG_FILE));
        assert!(find_config_file(&nested, "missing.yaml").is_none());
    }

    #[test]
    fn test_load_config_file_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("apex.yaml");
        std::fs::write(&path, "tasks: [not, a, map]\n").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.to_string().contains("apex.yaml"));
    }

    #[test]
    fn test_unreadable_config_is_a_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.yaml");

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ApexError::Config(ref message) if message.contains("absent.yaml")));
        assert!(err.to_string().starts_with("Configuration error: Failed to read config"));
    }
}
