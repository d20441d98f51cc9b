//! Loads the runnable tasks of one configuration
//!
//! Plugins contribute an addon configuration. `config` and `generates` are
//! merged right away; tasks are parsed per source and merged by canonical name
//! afterwards, so shorthand keys never shadow each other.

use std::path::Path;

use crate::configs::Configuration;
use crate::merge::merge_configurations;
use crate::plugins::PluginPipeline;
use crate::tasks::{parse_tasks, TaskSet};
use crate::types::ApexResult;

/// A configuration after plugin processing, with its parsed tasks
#[derive(Debug, Clone)]
pub struct LoadedConfiguration {
    pub config: Configuration,
    pub tasks: TaskSet,
}

pub async fn load_tasks(
    config: &Configuration,
    plugins: &dyn PluginPipeline,
    base_dir: &Path,
) -> ApexResult<LoadedConfiguration> {
    let addon = plugins.process(config, base_dir).await?;
    let merged = merge_configurations(config, &addon);

    let mut tasks = parse_tasks(&config.tasks);
    let plugin_tasks = parse_tasks(&addon.tasks);
    tracing::debug!(
        user = tasks.len(),
        plugin = plugin_tasks.len(),
        "parsed task definitions"
    );
    tasks.merge_missing(plugin_tasks);

    Ok(LoadedConfiguration {
        config: merged,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::{RawTaskDefinition, TaskDefinition};
    use crate::plugins::NoPlugins;
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use serde_json::json;

    /// Returns the given configuration merged with a fixed addon, like a real plugin would
    struct FixedPlugin {
        addon: Configuration,
    }

    #[async_trait]
    impl PluginPipeline for FixedPlugin {
        async fn process(
            &self,
            config: &Configuration,
            _base_dir: &Path,
        ) -> ApexResult<Configuration> {
            let mut out = config.clone();
            out.config.extend(self.addon.config.clone());
            out.tasks.extend(self.addon.tasks.clone());
            Ok(out)
        }
    }

    fn definition(cmds: &[&str], deps: &[&str]) -> Option<RawTaskDefinition> {
        Some(RawTaskDefinition::Definition(TaskDefinition {
            cmds: Some(cmds.iter().map(|s| s.to_string()).collect()),
            deps: Some(deps.iter().map(|s| s.to_string()).collect()),
            ..TaskDefinition::default()
        }))
    }

    #[tokio::test]
    async fn test_tasks_from_plugin_do_not_override_user_tasks() {
        let user = Configuration {
            config: IndexMap::from([("value".to_string(), json!("original"))]),
            tasks: IndexMap::from([
                ("build ".to_string(), definition(&["echo \"original\""], &["dep"])),
                ("dep ".to_string(), definition(&[], &[])),
            ]),
            ..Configuration::default()
        };
        let plugin = FixedPlugin {
            addon: Configuration {
                config: IndexMap::from([
                    ("value".to_string(), json!("plugin")),
                    ("name".to_string(), json!("from-plugin")),
                ]),
                tasks: IndexMap::from([
                    ("build > generate".to_string(), definition(&["echo plugin"], &[])),
                    ("lint".to_string(), definition(&["echo lint"], &[])),
                ]),
                ..Configuration::default()
            },
        };

        let loaded = load_tasks(&user, &plugin, Path::new(".")).await.unwrap();

        let build = loaded.tasks.get("build").unwrap();
        assert_eq!(build.cmds, vec!["echo \"original\"".to_string()]);
        assert_eq!(build.deps, vec!["dep".to_string()]);
        assert!(loaded.tasks.get("dep").unwrap().cmds.is_empty());
        assert_eq!(loaded.tasks.get("lint").unwrap().cmds, vec!["echo lint".to_string()]);
        assert_eq!(loaded.tasks.default_task.as_deref(), Some("build"));

        assert_eq!(loaded.config.config["value"], json!("original"));
        assert_eq!(loaded.config.config["name"], json!("from-plugin"));
    }

    #[tokio::test]
    async fn test_load_without_plugins() {
        let user = Configuration {
            tasks: IndexMap::from([("test > build".to_string(), definition(&["cargo test"], &[]))]),
            ..Configuration::default()
        };

        let loaded = load_tasks(&user, &NoPlugins, Path::new(".")).await.unwrap();

        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks.get("test").unwrap().deps, vec!["build".to_string()]);
        assert_eq!(loaded.config, user);
    }
}
