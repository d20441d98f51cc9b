use anyhow::{Context, Result};
use colored::*;

use crate::commands::load_manager;
use crate::ConfigArgs;

pub async fn execute(config: &ConfigArgs) -> Result<()> {
    let manager = load_manager(config)?;
    let results = manager
        .list_tasks()
        .await
        .context("Failed to list tasks")?;
    let multiple = results.len() > 1;

    for (index, result) in results.iter().enumerate() {
        if multiple {
            if index > 0 {
                println!();
            }
            let spec = result.spec.as_deref().unwrap_or("no spec");
            println!(
                "{} {}",
                format!("Configuration {}", index + 1).bold(),
                format!("({})", spec).dimmed()
            );
        }
        println!("{}", "Tasks".bold().underline());

        if result.tasks.is_empty() {
            println!("  {}", "No tasks defined".dimmed());
            continue;
        }

        let width = result
            .tasks
            .iter()
            .map(|task| task.name.len())
            .max()
            .unwrap_or(0);

        for task in &result.tasks {
            let name = format!("{:width$}", task.name, width = width);
            let is_default = result.default_task.as_deref() == Some(task.name.as_str());
            let mut line = format!("  {}", name.cyan().bold());
            if !task.description.is_empty() {
                line.push_str(&format!("  {}", task.description));
            }
            if !task.deps.is_empty() {
                line.push_str(&format!("  {}", format!("[{}]", task.deps.join(", ")).dimmed()));
            }
            if is_default {
                line.push_str(&format!("  {}", "(default)".green()));
            }
            println!("{}", line);
        }
    }

    Ok(())
}
