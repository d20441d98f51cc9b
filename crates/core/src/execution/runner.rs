//! Task graph executor
//!
//! Resolves requested task names into dependency-first execution. Traversal is
//! depth-first and strictly sequential: a task's dependencies finish before its
//! first command starts, and requested roots run left to right. One visit
//! tracker spans the whole invocation so shared dependencies run once.

use std::collections::HashMap;
use std::path::PathBuf;

use colored::*;
use indexmap::IndexMap;

use crate::configs::Configuration;
use crate::env::task_environment;
use crate::execution::command::{CaptureMap, CommandOptions};
use crate::execution::visits::Visits;
use crate::plugins::CodeGenerator;
use crate::tasks::{TaskSet, GENERATE_TASK};
use crate::types::{ApexError, ApexResult};

/// Options for one `run_tasks` invocation
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Do not echo commands
    pub quiet: bool,
    /// Collect command output instead of streaming it
    pub capture: bool,
    /// Extra variables layered over the derived environment
    pub env_overrides: IndexMap<String, String>,
    /// Working directory for every command
    pub base_dir: PathBuf,
}

/// Names to start from: the requested ones, or else the default task
pub(crate) fn requested_roots(
    tasks: &TaskSet,
    requested: &[String],
    task_not_found_is_fatal: bool,
) -> ApexResult<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    if tasks.is_empty() {
        if task_not_found_is_fatal {
            return Err(ApexError::NoTasksDefined);
        }
        return Ok(Vec::new());
    }
    Ok(tasks.default_task.iter().cloned().collect())
}

/// Executes tasks of one configuration
pub struct TaskGraphExecutor<'a> {
    config: &'a Configuration,
    tasks: &'a TaskSet,
    generator: &'a dyn CodeGenerator,
    options: &'a RunOptions,
    task_not_found_is_fatal: bool,
}

impl<'a> TaskGraphExecutor<'a> {
    pub fn new(
        config: &'a Configuration,
        tasks: &'a TaskSet,
        generator: &'a dyn CodeGenerator,
        options: &'a RunOptions,
        task_not_found_is_fatal: bool,
    ) -> Self {
        Self {
            config,
            tasks,
            generator,
            options,
            task_not_found_is_fatal,
        }
    }

    /// Run `requested` (or the default task) and everything they depend on.
    ///
    /// Returns the combined capture map in capture mode, `None` otherwise.
    pub async fn run_tasks(&self, requested: &[String]) -> ApexResult<Option<CaptureMap>> {
        let roots = requested_roots(self.tasks, requested, self.task_not_found_is_fatal)?;
        if roots.is_empty() {
            tracing::debug!("no tasks requested and none defined");
            return Ok(None);
        }

        let env = task_environment(self.config, &self.options.env_overrides);
        let mut visits = Visits::new();
        let mut outputs = CaptureMap::new();

        for name in &roots {
            self.run(name, &mut visits, &env, &mut outputs).await?;
        }

        Ok(self.options.capture.then_some(outputs))
    }

    async fn run(
        &self,
        name: &str,
        visits: &mut Visits,
        env: &HashMap<String, String>,
        outputs: &mut CaptureMap,
    ) -> ApexResult<()> {
        if !visits.enter(name)? {
            tracing::debug!(task = name, "already ran");
            return Ok(());
        }

        match self.tasks.get(name) {
            Some(task) => {
                for dep in &task.deps {
                    Box::pin(self.run(dep, visits, env, outputs)).await?;
                }

                tracing::debug!(task = name, commands = task.cmds.len(), "running task");
                let command_options = CommandOptions {
                    capture: self.options.capture,
                    quiet: self.options.quiet,
                    env,
                    base_dir: &self.options.base_dir,
                };
                let captured = task.run(name, command_options).await?;
                outputs.extend(captured);
            }
            None if name == GENERATE_TASK => {
                if !self.options.quiet {
                    println!("{}", "apex generate".bold());
                }
                self.generator
                    .generate(self.config, &self.options.base_dir)
                    .await?;
            }
            None if self.task_not_found_is_fatal => {
                return Err(ApexError::TaskNotFound(name.to_string()));
            }
            None => {
                tracing::warn!(task = name, "task not defined in this configuration; skipping");
            }
        }

        visits.leave(name);
        Ok(())
    }
}

/// Run tasks of `config` with a fresh invocation state
pub async fn run_tasks(
    config: &Configuration,
    tasks: &TaskSet,
    requested: &[String],
    task_not_found_is_fatal: bool,
    options: &RunOptions,
    generator: &dyn CodeGenerator,
) -> ApexResult<Option<CaptureMap>> {
    TaskGraphExecutor::new(config, tasks, generator, options, task_not_found_is_fatal)
        .run_tasks(requested)
        .await
}
