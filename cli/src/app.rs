//! Application context: unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern requires only one field change here;
//! command signatures stay the same.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::SuiteConfig;
use crate::infra::azure::AzureCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigLoader;
use crate::infra::terraform::TerraformCli;
use crate::infra::working_copy::TempWorkingCopies;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Explicit config file (`--config`).
    pub config: Option<PathBuf>,
    /// Override for `terraform.dir` (`--terraform-dir`).
    pub terraform_dir: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loaded configuration with CLI overrides applied.
    pub config: SuiteConfig,
    /// Terraform adapter.
    pub terraform: TerraformCli<TokioCommandRunner>,
    /// Azure resource checker.
    pub azure: AzureCli<TokioCommandRunner>,
    /// Working copies for `all --parallel`.
    pub working_copies: TempWorkingCopies,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let mut config = YamlConfigLoader::new(flags.config.clone()).load()?;
        if let Some(dir) = &flags.terraform_dir {
            config.terraform.dir.clone_from(dir);
        }

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        // JSON owns stdout.
        let quiet = flags.quiet || flags.json;

        let terraform =
            TerraformCli::default_runner(config.command_timeout(), config.apply_timeout());
        let azure = AzureCli::from_env(
            TokioCommandRunner::new(config.azure_timeout()),
            &config.azure.binary,
        );

        Ok(Self {
            output: OutputContext::new(flags.no_color, quiet),
            mode,
            config,
            terraform,
            azure,
            working_copies: TempWorkingCopies,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter bound to this context's output settings.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
