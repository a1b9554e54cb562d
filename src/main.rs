// ABOUTME: Entry point for the webship CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Target;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use webship::config::{self, CONFIG_FILENAME, Config};
use webship::error::Result;
use webship::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { site, force } => {
            config::init_config(&cwd, site.as_deref(), force)?;
            output.success(&format!("Created {}", CONFIG_FILENAME));
            Ok(())
        }
        Commands::Pack => {
            let config = load_config(&cwd, None)?;
            commands::pack(&config, &cwd, &output)
        }
        Commands::Deploy { archive, target } => {
            let config = load_config(&cwd, target.destination.as_deref())?;
            commands::deploy(&config, &cwd, &archive, &Target::from(target), output).await
        }
        Commands::Release { target } => {
            let config = load_config(&cwd, target.destination.as_deref())?;
            commands::release(&config, &cwd, &Target::from(target), output).await
        }
        Commands::Status {
            destination,
            local_root,
        } => {
            let config = load_config(&cwd, destination.as_deref())?;
            commands::status(&config, local_root.as_deref(), &output).await
        }
    }
}

/// Discover the config in `dir` and apply destination overrides.
fn load_config(dir: &Path, destination: Option<&str>) -> Result<Config> {
    let config = Config::discover(dir)?;
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}
