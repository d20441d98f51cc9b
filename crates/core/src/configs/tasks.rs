use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A task entry exactly as written in the configuration file.
///
/// The two accepted shapes are resolved once, at parse time, so nothing
/// downstream has to inspect the raw value again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawTaskDefinition {
    /// Shorthand form: `build: ["cargo build"]`
    Commands(Vec<String>),
    /// Full form: `build: { cmds: [...], deps: [...], description: ... }`
    Definition(TaskDefinition),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmds: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<Vec<String>>,
    /// Execution strategy name; only `shell` is implemented
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_list_parses_as_commands() {
        let raw: RawTaskDefinition = serde_yaml::from_str("- echo a\n- echo b\n").unwrap();
        assert_eq!(
            raw,
            RawTaskDefinition::Commands(vec!["echo a".to_string(), "echo b".to_string()])
        );
    }

    #[test]
    fn test_object_form_parses_as_definition() {
        let raw: RawTaskDefinition = serde_yaml::from_str(
            "description: Build it\ncmds: [cargo build]\ndeps: [clean]\n",
        )
        .unwrap();
        assert_eq!(
            raw,
            RawTaskDefinition::Definition(TaskDefinition {
                description: Some("Build it".to_string()),
                cmds: Some(vec!["cargo build".to_string()]),
                deps: Some(vec!["clean".to_string()]),
                runner: None,
            })
        );
    }

    #[test]
    fn test_empty_object_parses_as_default_definition() {
        let raw: RawTaskDefinition = serde_yaml::from_str("{}").unwrap();
        assert_eq!(raw, RawTaskDefinition::Definition(TaskDefinition::default()));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw: RawTaskDefinition =
            serde_yaml::from_str("cmds: [echo a]\ncolor: red\ntimeout: 30\n").unwrap();
        assert_eq!(
            raw,
            RawTaskDefinition::Definition(TaskDefinition {
                cmds: Some(vec!["echo a".to_string()]),
                ..TaskDefinition::default()
            })
        );
    }
}
