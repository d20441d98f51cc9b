//! Execution planning
//!
//! Walks the task graph exactly like the executor does, without spawning
//! anything, and records what would happen in order.

use std::fmt;

use crate::execution::runner::requested_roots;
use crate::execution::visits::Visits;
use crate::tasks::{TaskSet, GENERATE_TASK};
use crate::types::{ApexError, ApexResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// A defined task runs its commands
    Task(String),
    /// The reserved `generate` task hands off to the code generator
    Generate,
    /// An undefined task is skipped (only when missing tasks are not fatal)
    Skipped(String),
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStep::Task(name) => f.write_str(name),
            PlanStep::Generate => write!(f, "{} (code generation)", GENERATE_TASK),
            PlanStep::Skipped(name) => write!(f, "{} (not defined, skipped)", name),
        }
    }
}

/// Resolve the steps `run_tasks` would take for `requested`
pub fn plan_tasks(
    tasks: &TaskSet,
    requested: &[String],
    task_not_found_is_fatal: bool,
) -> ApexResult<Vec<PlanStep>> {
    let mut visits = Visits::new();
    let mut steps = Vec::new();

    for name in requested_roots(tasks, requested, task_not_found_is_fatal)? {
        visit(tasks, &name, task_not_found_is_fatal, &mut visits, &mut steps)?;
    }

    Ok(steps)
}

fn visit(
    tasks: &TaskSet,
    name: &str,
    task_not_found_is_fatal: bool,
    visits: &mut Visits,
    steps: &mut Vec<PlanStep>,
) -> ApexResult<()> {
    if !visits.enter(name)? {
        return Ok(());
    }

    match tasks.get(name) {
        Some(task) => {
            for dep in &task.deps {
                visit(tasks, dep, task_not_found_is_fatal, visits, steps)?;
            }
            steps.push(PlanStep::Task(name.to_string()));
        }
        None if name == GENERATE_TASK => steps.push(PlanStep::Generate),
        None if task_not_found_is_fatal => return Err(ApexError::TaskNotFound(name.to_string())),
        None => steps.push(PlanStep::Skipped(name.to_string())),
    }

    visits.leave(name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::RawTaskDefinition;
    use crate::tasks::parse_tasks;
    use indexmap::IndexMap;

    fn tasks(keys: &[&str]) -> TaskSet {
        let raw: IndexMap<String, Option<RawTaskDefinition>> = keys
            .iter()
            .map(|key| (key.to_string(), Some(RawTaskDefinition::Commands(Vec::new()))))
            .collect();
        parse_tasks(&raw)
    }

    fn task_steps(names: &[&str]) -> Vec<PlanStep> {
        names.iter().map(|n| PlanStep::Task(n.to_string())).collect()
    }

    #[test]
    fn test_plan_orders_dependencies_first() {
        let set = tasks(&["all > clean generate build", "clean", "build > clean"]);

        let steps = plan_tasks(&set, &["all".to_string()], true).unwrap();

        assert_eq!(
            steps,
            vec![
                PlanStep::Task("clean".to_string()),
                PlanStep::Generate,
                PlanStep::Task("build".to_string()),
                PlanStep::Task("all".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_uses_default_task() {
        let set = tasks(&["build", "test > build"]);
        assert_eq!(plan_tasks(&set, &[], false).unwrap(), task_steps(&["build"]));
    }

    #[test]
    fn test_plan_repeated_roots_are_visited_once() {
        let set = tasks(&["build", "test > build"]);
        let requested = vec!["test".to_string(), "build".to_string(), "test".to_string()];
        assert_eq!(
            plan_tasks(&set, &requested, true).unwrap(),
            task_steps(&["build", "test"])
        );
    }

    #[test]
    fn test_plan_missing_tasks() {
        let set = tasks(&["build > lint"]);

        assert!(matches!(
            plan_tasks(&set, &["build".to_string()], true),
            Err(ApexError::TaskNotFound(name)) if name == "lint"
        ));
        assert_eq!(
            plan_tasks(&set, &["build".to_string()], false).unwrap(),
            vec![
                PlanStep::Skipped("lint".to_string()),
                PlanStep::Task("build".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_reports_cycles() {
        let set = tasks(&["a > b", "b > c", "c > a"]);
        let err = plan_tasks(&set, &["a".to_string()], true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Circular task dependency detected: a -> b -> c -> a"
        );
    }

    #[test]
    fn test_plan_step_display() {
        assert_eq!(PlanStep::Task("build".to_string()).to_string(), "build");
        assert_eq!(PlanStep::Generate.to_string(), "generate (code generation)");
        assert_eq!(
            PlanStep::Skipped("lint".to_string()).to_string(),
            "lint (not defined, skipped)"
        );
    }
}
