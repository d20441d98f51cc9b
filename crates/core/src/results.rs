//! Result types for task manager operations

use crate::execution::PlanStep;
use crate::tasks::Task;

/// Summary of one task for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub name: String,
    pub description: String,
    pub deps: Vec<String>,
}

/// Tasks of one configuration document, in definition order
#[derive(Debug, Clone)]
pub struct TaskListResult {
    pub spec: Option<String>,
    pub tasks: Vec<TaskInfo>,
    pub default_task: Option<String>,
}

/// Execution plan of one configuration document
#[derive(Debug, Clone)]
pub struct TaskPlanResult {
    pub spec: Option<String>,
    pub steps: Vec<PlanStep>,
}

impl TaskInfo {
    pub fn from_task(name: &str, task: &Task) -> Self {
        Self {
            name: name.to_string(),
            description: task.description.clone(),
            deps: task.deps.clone(),
        }
    }
}
