use std::path::PathBuf;

use anyhow::Result;
use apex_core::configs::configuration::DEFAULT_CONFIG_FILE;
use apex_core::ApexError;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter, e.g. `APEX_LOG=apex_core=debug`
const LOG_ENV_VAR: &str = "APEX_LOG";

/// Apex - code generation and task runner
#[derive(Parser)]
#[command(name = "apex")]
#[command(about = "Run the tasks defined in an apex.yaml configuration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a configuration
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Configuration file, searched for in parent directories when given as a bare name
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Program that applies configuration plugins (reads JSON on stdin, prints JSON)
    #[arg(long, value_name = "PROGRAM")]
    plugin_host: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tasks and their dependencies
    Run {
        /// Tasks to run (defaults to the first task of each configuration)
        tasks: Vec<String>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Do not echo commands
        #[arg(short, long)]
        quiet: bool,

        /// List the available tasks instead of running
        #[arg(short, long)]
        list: bool,

        /// Fail on undefined tasks even in multi-document configurations
        #[arg(long)]
        fail_undefined: bool,

        /// Extra environment variable for every command
        #[arg(
            short,
            long = "env",
            value_name = "KEY=VALUE",
            value_parser = commands::run::parse_env_pair
        )]
        env: Vec<(String, String)>,

        /// Program that runs code generation for the `generate` task
        #[arg(long, value_name = "PROGRAM")]
        generator: Option<String>,
    },
    /// List configuration contents
    List {
        #[command(subcommand)]
        list_command: ListCommands,
    },
    /// Show the execution order for tasks without running them
    Plan {
        /// Tasks to plan (defaults to the first task of each configuration)
        tasks: Vec<String>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Fail on undefined tasks even in multi-document configurations
        #[arg(long)]
        fail_undefined: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Subcommand)]
enum ListCommands {
    /// List the tasks of each configuration
    Tasks {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = execute(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(exit_code(&err));
    }
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            tasks,
            config,
            quiet,
            list,
            fail_undefined,
            env,
            generator,
        } => {
            if list {
                return commands::list::execute(&config).await;
            }
            let options = commands::run::RunArgs {
                quiet,
                fail_undefined,
                env,
                generator,
            };
            commands::run::execute(&config, &tasks, options).await
        }
        Commands::List { list_command } => match list_command {
            ListCommands::Tasks { config } => commands::list::execute(&config).await,
        },
        Commands::Plan {
            tasks,
            config,
            fail_undefined,
        } => commands::plan::execute(&config, &tasks, fail_undefined).await,
        Commands::Schema => commands::schema::execute(),
    }
}

/// The failing command's exit code, or 1 for any other error
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApexError>())
        .map(ApexError::exit_code)
        .unwrap_or(1)
}
