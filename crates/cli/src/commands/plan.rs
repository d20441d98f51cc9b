use anyhow::{Context, Result};
use apex_core::execution::PlanStep;
use colored::*;

use crate::commands::load_manager;
use crate::ConfigArgs;

pub async fn execute(config: &ConfigArgs, tasks: &[String], fail_undefined: bool) -> Result<()> {
    let manager = load_manager(config)?;
    let plans = manager
        .plan(tasks, fail_undefined)
        .await
        .context("Failed to resolve execution plan")?;
    let multiple = plans.len() > 1;

    for (index, plan) in plans.iter().enumerate() {
        if multiple {
            if index > 0 {
                println!();
            }
            let spec = plan.spec.as_deref().unwrap_or("no spec");
            println!(
                "{} {}",
                format!("Configuration {}", index + 1).bold(),
                format!("({})", spec).dimmed()
            );
        }

        println!("{}:", "Execution order".bold());
        if plan.steps.is_empty() {
            println!("  {}", "Nothing to run".dimmed());
            continue;
        }
        for (i, step) in plan.steps.iter().enumerate() {
            let label = match step {
                PlanStep::Task(_) => step.to_string().normal(),
                PlanStep::Generate => step.to_string().magenta(),
                PlanStep::Skipped(_) => step.to_string().dimmed(),
            };
            println!("  {}. {}", i + 1, label);
        }
    }

    Ok(())
}
