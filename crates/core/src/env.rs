//! Environment variables injected into task commands

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::configs::Configuration;

/// Variable carrying the active specification path
pub const SPEC_ENV_VAR: &str = "apex_spec";
/// Prefix of the variables derived from the `config` section
pub const CONFIG_ENV_PREFIX: &str = "apex_config";

/// Flatten a nested value into `prefix_key_index...` variables.
///
/// `_` is both the separator and a legal key character, so `{a_b: 1}` and
/// `{a: {b: 1}}` both produce `prefix_a_b`; the entry visited last wins.
pub fn flatten(prefix: &str, value: &Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    flatten_into(prefix, value, &mut out);
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Null => {
            out.insert(prefix.to_string(), String::new());
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{}_{}", prefix, index), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_into(&format!("{}_{}", prefix, key), item, out);
            }
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
    }
}

/// Build the environment for a task's commands: the spec path, then the
/// flattened `config` section, then caller overrides (highest precedence).
pub fn task_environment(
    config: &Configuration,
    overrides: &IndexMap<String, String>,
) -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert(
        SPEC_ENV_VAR.to_string(),
        config.spec.clone().unwrap_or_default(),
    );

    for (key, value) in &config.config {
        flatten_into(&format!("{}_{}", CONFIG_ENV_PREFIX, key), value, &mut env);
    }

    env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}
