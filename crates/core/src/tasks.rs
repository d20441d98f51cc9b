//! Canonical task records and the task definition parser
//!
//! Raw keys may embed dependency shorthand, `"start > a b c"`, which is split
//! once into the task name and a list of dependencies. Shorthand dependencies
//! are placed before any explicitly declared `deps`.

use std::fmt;

use indexmap::IndexMap;

use crate::configs::{RawTaskDefinition, TaskDefinition};

/// Separator between a task name and its shorthand dependencies
pub const SHORTHAND_SEPARATOR: char = '>';

/// Reserved name that runs code generation when no task by that name exists
pub const GENERATE_TASK: &str = "generate";

/// Strategy used to execute a task's commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskRunner {
    /// Each command runs through the platform shell
    #[default]
    Shell,
    /// A runner name this build does not implement. Running the task fails.
    Unknown(String),
}

impl TaskRunner {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "shell" | "dax" => Self::Shell,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TaskRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRunner::Shell => f.write_str("shell"),
            TaskRunner::Unknown(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    /// Prerequisites in execution order. Duplicates are allowed.
    pub deps: Vec<String>,
    pub cmds: Vec<String>,
    pub runner: TaskRunner,
}

impl Task {
    /// Build a canonical task from its raw definition. `shorthand_deps` come first.
    pub fn from_raw(raw: Option<&RawTaskDefinition>, shorthand_deps: Vec<String>) -> Self {
        let mut task = match raw {
            None => Task::default(),
            Some(RawTaskDefinition::Commands(cmds)) => Task {
                cmds: cmds.clone(),
                ..Task::default()
            },
            Some(RawTaskDefinition::Definition(def)) => Self::from_definition(def),
        };

        if !shorthand_deps.is_empty() {
            let explicit = std::mem::take(&mut task.deps);
            task.deps = shorthand_deps;
            task.deps.extend(explicit);
        }

        task
    }

    fn from_definition(def: &TaskDefinition) -> Self {
        Task {
            description: def.description.clone().unwrap_or_default(),
            deps: def.deps.clone().unwrap_or_default(),
            cmds: def.cmds.clone().unwrap_or_default(),
            runner: def
                .runner
                .as_deref()
                .map(TaskRunner::from_name)
                .unwrap_or_default(),
        }
    }
}

/// Split a raw task key into its name and shorthand dependencies.
///
/// An empty right-hand side, as in `"build >"`, means no shorthand dependencies.
pub fn split_task_key(key: &str) -> (String, Vec<String>) {
    match key.split_once(SHORTHAND_SEPARATOR) {
        Some((name, deps)) => (
            name.trim().to_string(),
            deps.split_whitespace().map(str::to_string).collect(),
        ),
        None => (key.trim().to_string(), Vec::new()),
    }
}

/// Parsed tasks of one configuration, in definition order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    pub tasks: IndexMap<String, Task>,
    /// Task run when none is requested: the first one defined
    pub default_task: Option<String>,
}

impl TaskSet {
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Add every task from `other` whose canonical name is not defined here.
    pub fn merge_missing(&mut self, other: TaskSet) {
        for (name, task) in other.tasks {
            self.tasks.entry(name).or_insert(task);
        }
        if self.default_task.is_none() {
            self.default_task = other.default_task;
        }
    }
}

/// Convert raw task entries into canonical tasks.
///
/// Never fails: an unimplemented runner is kept on its task and only
/// reported when that task runs.
pub fn parse_tasks(raw: &IndexMap<String, Option<RawTaskDefinition>>) -> TaskSet {
    let mut set = TaskSet::default();

    for (key, def) in raw {
        let (name, shorthand_deps) = split_task_key(key);
        let task = Task::from_raw(def.as_ref(), shorthand_deps);
        if set.default_task.is_none() {
            set.default_task = Some(name.clone());
        }
        set.tasks.insert(name, task);
    }

    set
}
