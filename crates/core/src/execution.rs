//! Task execution module
//!
//! This module handles the actual execution of tasks including command execution,
//! dependency traversal, and execution planning.

pub mod command;
pub mod plan;
pub mod runner;
pub mod visits;

pub use command::{CaptureMap, CmdOutput, CommandExecutor, CommandOptions};
pub use plan::{plan_tasks, PlanStep};
pub use runner::{run_tasks, RunOptions, TaskGraphExecutor};
