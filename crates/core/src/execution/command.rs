//! Command execution utilities
//!
//! Runs a task's command sequence through the platform shell, either streaming
//! to the console or capturing combined output, and stops at the first failure.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use colored::*;
use indexmap::IndexMap;
use tokio::process::Command;

use crate::platform::{exit_status_code, ShellInfo};
use crate::tasks::{Task, TaskRunner};
use crate::types::{ApexError, ApexResult};

/// Captured output of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdOutput {
    /// Command as written (trimmed)
    pub cmd: String,
    /// Combined stdout and stderr
    pub output: Vec<u8>,
}

/// Captured outputs keyed by normalized command text
pub type CaptureMap = IndexMap<String, CmdOutput>;

/// Per-task execution settings
#[derive(Debug, Clone, Copy)]
pub struct CommandOptions<'a> {
    pub capture: bool,
    pub quiet: bool,
    pub env: &'a HashMap<String, String>,
    pub base_dir: &'a Path,
}

/// Join a possibly multi-line command block into a single line
pub fn normalize_command(cmd: &str) -> String {
    cmd.trim()
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shell command executor bound to a working directory and environment
pub struct CommandExecutor<'a> {
    base_dir: &'a Path,
    env: &'a HashMap<String, String>,
    shell: ShellInfo,
}

impl<'a> CommandExecutor<'a> {
    pub fn new(base_dir: &'a Path, env: &'a HashMap<String, String>) -> Self {
        Self {
            base_dir,
            env,
            shell: ShellInfo::current(),
        }
    }

    fn shell_command(&self, script: &str) -> Command {
        let mut command = Command::new(self.shell.program);
        command
            .arg(self.shell.command_flag)
            .arg(script)
            .current_dir(self.base_dir)
            .envs(self.env);
        command
    }

    /// Run a command with inherited standard I/O
    pub async fn execute_streaming(&self, cmd: &str) -> ApexResult<()> {
        let status = self
            .shell_command(cmd)
            .status()
            .await
            .map_err(|e| spawn_error(cmd, e))?;

        if !status.success() {
            return Err(ApexError::CommandFailed {
                command: cmd.to_string(),
                code: exit_status_code(status),
            });
        }
        Ok(())
    }

    /// Run a command and return its combined stdout/stderr bytes
    pub async fn execute_captured(&self, cmd: &str) -> ApexResult<Vec<u8>> {
        let output = self
            .shell_command(&self.shell.with_combined_output(cmd))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(cmd, e))?;

        if !output.status.success() {
            return Err(ApexError::CommandFailed {
                command: cmd.to_string(),
                code: exit_status_code(output.status),
            });
        }

        let mut combined = output.stdout;
        combined.extend(output.stderr);
        Ok(combined)
    }
}

fn spawn_error(cmd: &str, e: std::io::Error) -> ApexError {
    ApexError::Io(std::io::Error::new(
        e.kind(),
        format!("Failed to execute command '{}': {}", cmd, e),
    ))
}

impl Task {
    /// Execute this task's commands in order, aborting on the first non-zero exit.
    ///
    /// Returns the captured outputs in capture mode, otherwise an empty map.
    /// An unimplemented runner fails before the first command starts.
    pub async fn run(&self, name: &str, options: CommandOptions<'_>) -> ApexResult<CaptureMap> {
        let mut outputs = CaptureMap::new();

        match &self.runner {
            TaskRunner::Unknown(runner) => {
                return Err(ApexError::UnknownRunner {
                    task: name.to_string(),
                    runner: runner.clone(),
                });
            }
            TaskRunner::Shell => {
                let executor = CommandExecutor::new(options.base_dir, options.env);
                for cmd in &self.cmds {
                    let cmd = cmd.trim();
                    let joined = normalize_command(cmd);

                    if options.capture {
                        let output = executor.execute_captured(&joined).await?;
                        outputs.insert(
                            joined,
                            CmdOutput {
                                cmd: cmd.to_string(),
                                output,
                            },
                        );
                    } else {
                        if !options.quiet {
                            println!("{}", cmd.bold());
                        }
                        executor.execute_streaming(&joined).await?;
                    }
                }
            }
        }

        Ok(outputs)
    }
}
