//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::Scenario;

/// Terraform lifecycle checks for Azure stacks
#[derive(Parser)]
#[command(
    name = "tfcheck",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: $TFCHECK_CONFIG, ./tfcheck.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the terraform definition
    #[arg(long, global = true, value_name = "DIR")]
    pub terraform_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply the stack, verify resources exist, then destroy it
    Apply,

    /// Run terraform init and validate
    Validate,

    /// Plan the stack and verify the expected resources are planned
    Plan,

    /// Run validate, plan, and apply
    All(commands::run::AllArgs),

    /// Show tfcheck and terraform versions
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// Returns `Ok(false)` when a scenario failed; the failure has already
    /// been rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or output fails.
    pub async fn run(self) -> Result<bool> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            terraform_dir,
            command,
            ..
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run(json, config).await?;
            return Ok(true);
        }

        let flags = AppFlags {
            no_color,
            quiet,
            json,
            config,
            terraform_dir,
        };
        let app = match AppContext::new(&flags) {
            Ok(app) => app,
            Err(e) if json => {
                println!(
                    "{}",
                    crate::output::json::format_error(&format!("{e:#}"), "CONFIG_ERROR")?
                );
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        match command {
            Command::Apply => commands::run::run(&app, &[Scenario::Provision], false).await,
            Command::Validate => commands::run::run(&app, &[Scenario::Validate], false).await,
            Command::Plan => commands::run::run(&app, &[Scenario::Plan], false).await,
            Command::All(args) => commands::run::run(&app, &commands::run::ALL, args.parallel).await,
            Command::Version => Ok(true),
        }
    }
}
