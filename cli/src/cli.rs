//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Install, configure and remove a Prometheus server on a systemd host
#[derive(Parser)]
#[command(
    name = "promctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Settings file (default: /etc/promctl/settings.yaml if present)
    #[arg(long, global = true, env = "PROMCTL_SETTINGS", value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the service identity, install Prometheus and start it
    Install,

    /// Add a scrape target to a job and restart the service
    AddTarget(commands::add_target::AddTargetArgs),

    /// Stop the service and delete everything install created
    Remove(commands::remove::RemoveArgs),

    /// Show the service state
    Status,

    /// Interactive menu
    Menu,
}

impl Cli {
    fn flags(&self) -> AppFlags {
        AppFlags {
            settings: self.settings.clone(),
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&self.flags())?;
        match self.command {
            Command::Install => commands::install::run(&app).await,
            Command::AddTarget(args) => commands::add_target::run(&app, &args).await,
            Command::Remove(args) => commands::remove::run(&app, &args).await,
            Command::Status => commands::status::run(&app).await,
            Command::Menu => commands::menu::run(&app).await,
        }
    }
}
