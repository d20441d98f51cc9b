//! Configuration file models
//!
//! The `apex.yaml` file is parsed into [`configuration::Configuration`] values, one
//! per YAML document. Task entries stay in their raw [`tasks::RawTaskDefinition`]
//! shape until [`crate::tasks::parse_tasks`] resolves them.

pub mod configuration;
pub mod tasks;

pub use configuration::{Configuration, RunAfterCommand, Target};
pub use tasks::{RawTaskDefinition, TaskDefinition};
