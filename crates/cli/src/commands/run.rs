use anyhow::{Context, Result};
use apex_core::plugins::ExternalGenerator;
use apex_core::task_manager::TaskRunRequest;
use colored::*;

use crate::commands::{load_manager, parse_program};
use crate::ConfigArgs;

pub struct RunArgs {
    pub quiet: bool,
    pub fail_undefined: bool,
    pub env: Vec<(String, String)>,
    pub generator: Option<String>,
}

pub async fn execute(config: &ConfigArgs, tasks: &[String], args: RunArgs) -> Result<()> {
    let mut manager = load_manager(config)?;
    if let Some(line) = &args.generator {
        let program = parse_program(line, "--generator")?;
        manager = manager.with_generator(Box::new(ExternalGenerator::new(program)));
    }

    let request = TaskRunRequest {
        quiet: args.quiet,
        capture: false,
        fail_undefined: args.fail_undefined,
        env_overrides: args.env.into_iter().collect(),
    };

    manager
        .run(tasks, &request)
        .await
        .context("Failed to run tasks")?;

    if !args.quiet {
        println!();
        println!(
            "{} {}",
            "✓".green().bold(),
            "All tasks completed successfully!".green().bold()
        );
    }

    Ok(())
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
