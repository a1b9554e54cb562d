// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webship")]
#[command(about = "Package a static site and cut hosts over to it atomically")]
#[command(version)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a webship.yml configuration file
    Init {
        /// Site name used for lock files
        #[arg(long)]
        site: Option<String>,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Pack the content directory into a timestamped archive
    Pack,

    /// Deploy an existing archive to the configured servers
    Deploy {
        /// Path to the archive to deploy
        archive: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Pack the content directory, then deploy the new archive
    Release {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show which release each server is serving
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Read a local directory tree instead of the servers
        #[arg(long, value_name = "DIR")]
        local_root: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Target destination (defined in config)
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Break a deploy lock held by someone else
    #[arg(long)]
    pub force: bool,

    /// Deploy into a local directory tree instead of the servers
    #[arg(long, value_name = "DIR", conflicts_with = "dry_run")]
    pub local_root: Option<PathBuf>,

    /// Print the remote operations without running them
    #[arg(long)]
    pub dry_run: bool,
}
