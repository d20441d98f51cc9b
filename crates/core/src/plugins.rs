//! Seams to the external plugin and code generation pipelines
//!
//! Both pipelines live outside this crate. The task engine only needs an
//! addon configuration from the plugin pipeline and a way to run the
//! generator for the reserved `generate` task. The `External*` implementations
//! talk to a helper program over stdin/stdout with JSON-encoded configurations.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::configs::Configuration;
use crate::platform::exit_status_code;
use crate::types::{ApexError, ApexResult};

/// Computes plugin-derived configuration for a user configuration
#[async_trait]
pub trait PluginPipeline: Send + Sync {
    async fn process(&self, config: &Configuration, base_dir: &Path) -> ApexResult<Configuration>;
}

/// Runs code generation for a configuration
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, config: &Configuration, base_dir: &Path) -> ApexResult<()>;
}

/// Plugin pipeline that contributes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlugins;

#[async_trait]
impl PluginPipeline for NoPlugins {
    async fn process(&self, config: &Configuration, _base_dir: &Path) -> ApexResult<Configuration> {
        if !config.plugins.is_empty() {
            tracing::warn!(
                plugins = config.plugins.len(),
                "configuration lists plugins but no plugin host is configured; skipping them"
            );
        }
        Ok(Configuration::default())
    }
}

/// Generator used when none is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGenerator;

#[async_trait]
impl CodeGenerator for NoGenerator {
    async fn generate(&self, _config: &Configuration, _base_dir: &Path) -> ApexResult<()> {
        Err(ApexError::Collaborator(
            "no code generator configured".to_string(),
        ))
    }
}

/// Helper program invocation: `program args...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProgram {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalProgram {
    /// Split a command line such as `"deno run plugins.ts"` on whitespace
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Feed `input` on stdin and wait for exit. Stdout is returned only when `capture_stdout`.
    async fn run(
        &self,
        base_dir: &Path,
        input: &[u8],
        capture_stdout: bool,
    ) -> ApexResult<Vec<u8>> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(base_dir)
            .stdin(Stdio::piped())
            .stdout(if capture_stdout {
                Stdio::piped()
            } else {
                Stdio::inherit()
            });

        let mut child = command.spawn().map_err(|e| {
            ApexError::Collaborator(format!("Failed to start '{}': {}", self.program, e))
        })?;

        // Stdin is written while stdout is drained.
        let stdin = child.stdin.take();
        let write_input = async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(input).await {
                    // The helper may exit without reading its input; its exit status decides.
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
            }
            Ok(())
        };

        let (written, output) = tokio::join!(write_input, child.wait_with_output());
        let output = output?;
        written?;

        if !output.status.success() {
            return Err(ApexError::Collaborator(format!(
                "'{}' failed with exit code: {}",
                self.program,
                exit_status_code(output.status)
            )));
        }

        Ok(output.stdout)
    }
}

/// Plugin pipeline backed by a helper program.
///
/// The program receives the configuration as JSON on stdin and prints the
/// plugin-computed configuration as JSON on stdout.
#[derive(Debug, Clone)]
pub struct ExternalPluginHost {
    pub program: ExternalProgram,
}

impl ExternalPluginHost {
    pub fn new(program: ExternalProgram) -> Self {
        Self { program }
    }
}

#[async_trait]
impl PluginPipeline for ExternalPluginHost {
    async fn process(&self, config: &Configuration, base_dir: &Path) -> ApexResult<Configuration> {
        if config.plugins.is_empty() {
            return Ok(Configuration::default());
        }

        tracing::info!(
            host = %self.program.program,
            plugins = ?config.plugins,
            "running configuration plugins"
        );
        let input = serde_json::to_vec(config)?;
        let stdout = self.program.run(base_dir, &input, true).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

/// Code generator backed by a helper program reading the configuration as JSON on stdin
#[derive(Debug, Clone)]
pub struct ExternalGenerator {
    pub program: ExternalProgram,
}

impl ExternalGenerator {
    pub fn new(program: ExternalProgram) -> Self {
        Self { program }
    }
}

#[async_trait]
impl CodeGenerator for ExternalGenerator {
    async fn generate(&self, config: &Configuration, base_dir: &Path) -> ApexResult<()> {
        tracing::info!(generator = %self.program.program, "running code generation");
        let input = serde_json::to_vec(config)?;
        self.program.run(base_dir, &input, false).await?;
        Ok(())
    }
}
