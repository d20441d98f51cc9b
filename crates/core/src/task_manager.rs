//! High-level task management interface
//!
//! [`TaskManager`] is the entry point used by the CLI. It locates and loads a
//! configuration file, runs each document through the plugin pipeline and then
//! lists, plans or runs tasks against every document in file order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use apex_core::task_manager::{TaskManager, TaskManagerConfig, TaskRunRequest};
//! use std::path::PathBuf;
//!
//! # async fn example() -> apex_core::types::ApexResult<()> {
//! let manager = TaskManager::new(TaskManagerConfig {
//!     config_path: PathBuf::from("apex.yaml"),
//!     search_dir: PathBuf::from("."),
//! })?;
//!
//! // Show what `apex run build` would do
//! let plans = manager.plan(&["build".to_string()], false).await?;
//!
//! // Run it
//! manager
//!     .run(&["build".to_string()], &TaskRunRequest::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::configs::configuration::{find_config_file, load_config_file};
use crate::configs::Configuration;
use crate::execution::{plan_tasks, run_tasks, CaptureMap, RunOptions};
use crate::loader::{load_tasks, LoadedConfiguration};
use crate::plugins::{CodeGenerator, NoGenerator, NoPlugins, PluginPipeline};
use crate::results::{TaskInfo, TaskListResult, TaskPlanResult};
use crate::types::{ApexError, ApexResult};

/// Configuration for initializing a task manager
#[derive(Debug, Clone)]
pub struct TaskManagerConfig {
    /// Configuration file. A bare file name is also searched for in parent directories.
    pub config_path: PathBuf,
    /// Directory the search starts from
    pub search_dir: PathBuf,
}

/// Flags for one [`TaskManager::run`] call
#[derive(Debug, Clone, Default)]
pub struct TaskRunRequest {
    pub quiet: bool,
    pub capture: bool,
    /// Treat undefined tasks as errors even in multi-document files
    pub fail_undefined: bool,
    pub env_overrides: IndexMap<String, String>,
}

/// Loaded configuration file plus the collaborators used to process it
pub struct TaskManager {
    pub config_path: PathBuf,
    /// Directory containing the configuration file. Every command runs here.
    pub base_dir: PathBuf,
    pub configurations: Vec<Configuration>,
    plugins: Box<dyn PluginPipeline>,
    generator: Box<dyn CodeGenerator>,
}

impl TaskManager {
    /// Locate and parse the configuration file. No plugins and no generator are attached.
    pub fn new(config: TaskManagerConfig) -> ApexResult<Self> {
        let config_path = resolve_config_path(&config.search_dir, &config.config_path)?;
        let base_dir = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => config.search_dir.clone(),
        };
        let configurations = load_config_file(&config_path)?;

        tracing::debug!(
            path = %config_path.display(),
            documents = configurations.len(),
            "loaded configuration"
        );

        Ok(Self {
            config_path,
            base_dir,
            configurations,
            plugins: Box::new(NoPlugins),
            generator: Box::new(NoGenerator),
        })
    }

    pub fn with_plugins(mut self, plugins: Box<dyn PluginPipeline>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// List the tasks of every configuration document
    pub async fn list_tasks(&self) -> ApexResult<Vec<TaskListResult>> {
        let mut results = Vec::with_capacity(self.configurations.len());

        for config in &self.configurations {
            let loaded = self.load(config).await?;
            results.push(TaskListResult {
                spec: loaded.config.spec.clone(),
                tasks: loaded
                    .tasks
                    .tasks
                    .iter()
                    .map(|(name, task)| TaskInfo::from_task(name, task))
                    .collect(),
                default_task: loaded.tasks.default_task.clone(),
            });
        }

        Ok(results)
    }

    /// Resolve the execution order for `requested` in every configuration document
    pub async fn plan(
        &self,
        requested: &[String],
        fail_undefined: bool,
    ) -> ApexResult<Vec<TaskPlanResult>> {
        let fatal = self.task_not_found_is_fatal(fail_undefined);
        let mut results = Vec::with_capacity(self.configurations.len());

        for config in &self.configurations {
            let loaded = self.load(config).await?;
            results.push(TaskPlanResult {
                spec: loaded.config.spec.clone(),
                steps: plan_tasks(&loaded.tasks, requested, fatal)?,
            });
        }

        Ok(results)
    }

    /// Run `requested` (or each document's default task) against every configuration document.
    ///
    /// Documents run in file order and the first failure stops everything after it.
    pub async fn run(
        &self,
        requested: &[String],
        request: &TaskRunRequest,
    ) -> ApexResult<Option<CaptureMap>> {
        let fatal = self.task_not_found_is_fatal(request.fail_undefined);
        let options = RunOptions {
            quiet: request.quiet,
            capture: request.capture,
            env_overrides: request.env_overrides.clone(),
            base_dir: self.base_dir.clone(),
        };
        let mut captured = CaptureMap::new();

        for (index, config) in self.configurations.iter().enumerate() {
            tracing::debug!(document = index, spec = ?config.spec, "running configuration");
            let loaded = self.load(config).await?;
            let outputs = run_tasks(
                &loaded.config,
                &loaded.tasks,
                requested,
                fatal,
                &options,
                self.generator.as_ref(),
            )
            .await?;
            if let Some(outputs) = outputs {
                captured.extend(outputs);
            }
        }

        Ok(request.capture.then_some(captured))
    }

    /// Missing tasks abort the run for single-document files or when asked to
    fn task_not_found_is_fatal(&self, fail_undefined: bool) -> bool {
        self.configurations.len() == 1 || fail_undefined
    }

    async fn load(&self, config: &Configuration) -> ApexResult<LoadedConfiguration> {
        load_tasks(config, self.plugins.as_ref(), &self.base_dir).await
    }
}

fn resolve_config_path(search_dir: &Path, config_path: &Path) -> ApexResult<PathBuf> {
    let candidate = search_dir.join(config_path);
    if candidate.is_file() {
        return Ok(candidate);
    }

    let is_bare_name = config_path.components().count() == 1;
    if is_bare_name {
        if let Some(file_name) = config_path.to_str() {
            if let Some(found) = find_config_file(search_dir, file_name) {
                return Ok(found);
            }
        }
    }

    Err(ApexError::ConfigNotFound(config_path.display().to_string()))
}
