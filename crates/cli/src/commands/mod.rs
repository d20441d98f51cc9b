pub mod list;
pub mod plan;
pub mod run;
pub mod schema;

use anyhow::{Context, Result};
use apex_core::plugins::{ExternalPluginHost, ExternalProgram};
use apex_core::task_manager::{TaskManager, TaskManagerConfig};

use crate::ConfigArgs;

/// Load the configuration named by `args`, searching from the current directory
pub fn load_manager(args: &ConfigArgs) -> Result<TaskManager> {
    let search_dir = std::env::current_dir().context("Failed to read the current directory")?;
    let manager = TaskManager::new(TaskManagerConfig {
        config_path: args.config.clone(),
        search_dir,
    })
    .context("Failed to load configuration")?;

    match &args.plugin_host {
        Some(line) => {
            let program = parse_program(line, "--plugin-host")?;
            Ok(manager.with_plugins(Box::new(ExternalPluginHost::new(program))))
        }
        None => Ok(manager),
    }
}

pub fn parse_program(line: &str, flag: &str) -> Result<ExternalProgram> {
    ExternalProgram::parse(line).ok_or_else(|| anyhow::anyhow!("{} requires a program", flag))
}
