//! Apex Core Library
//!
//! Core of the Apex code generation tool: configuration loading, the task
//! definition parser and the task graph executor behind `apex run`.
//!
//! ## Architecture
//!
//! - [`task_manager`] - High-level interface used by the CLI
//! - [`configs`] - `apex.yaml` parsing (multi-document)
//! - [`merge`] - Layering plugin-derived configuration under the user's
//! - [`loader`] - Plugin processing and task merging for one configuration
//! - [`tasks`] - Canonical task records and the `name > deps` shorthand
//! - [`execution`] - Dependency-first task execution and planning
//! - [`env`] - Environment variables derived from a configuration
//! - [`plugins`] - Seams to the plugin host and the code generator
//! - [`platform`] - Shell selection for the host OS
//! - [`results`] - Result types for task manager operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
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
//! manager.run(&[], &TaskRunRequest::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod env;
pub mod execution;
pub mod loader;
pub mod merge;
pub mod platform;
pub mod plugins;
pub mod results;
pub mod task_manager;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use types::{ApexError, ApexResult};
pub use task_manager::{TaskManager, TaskManagerConfig, TaskRunRequest};
