//! Infrastructure implementation of the `Terraform` port.
//!
//! `TerraformCli<R>` routes every terraform call through a `CommandRunner`
//! and retries failures whose output matches the options' retry policy.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, Terraform};
use crate::domain::error::TerraformError;
use crate::domain::options::decode_output;
use crate::domain::{PlanStruct, Subcommand, TerraformOptions};
use crate::infra::command_runner::TokioCommandRunner;

/// Infrastructure adapter that drives the terraform binary.
///
/// `apply`, `destroy`, and `plan` run under `apply_timeout`; everything else
/// under `command_timeout`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
    command_timeout: Duration,
    apply_timeout: Duration,
}

impl<R: CommandRunner> TerraformCli<R> {
    /// Create an adapter with explicit timeouts.
    pub fn new(runner: R, command_timeout: Duration, apply_timeout: Duration) -> Self {
        Self {
            runner,
            command_timeout,
            apply_timeout,
        }
    }

    /// The underlying command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Version reported by `<binary> version -json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be run, exits non-zero, or
    /// prints something that carries no version.
    pub async fn version(&self, binary: &str) -> Result<String> {
        let out = self
            .runner
            .run_with_timeout(binary, &["version", "-json"], self.command_timeout)
            .await?;
        if !out.status.success() {
            anyhow::bail!(
                "{binary} version exited with code {}",
                out.status.code().unwrap_or(-1)
            );
        }
        parse_version(&String::from_utf8_lossy(&out.stdout))
            .ok_or_else(|| anyhow::anyhow!("no version in `{binary} version` output"))
    }

    fn timeout_for(&self, sub: Subcommand) -> Duration {
        if sub.is_long_running() {
            self.apply_timeout
        } else {
            self.command_timeout
        }
    }

    /// Run one terraform subcommand, retrying known-transient failures.
    async fn run_command(
        &self,
        opts: &TerraformOptions,
        sub: Subcommand,
        args: &[String],
    ) -> Result<Output> {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let timeout = self.timeout_for(sub);
        let max_attempts = opts.retry.max_attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            tracing::info!(subcommand = %sub, attempt, "running terraform");
            let output = self
                .runner
                .run_with_timeout(&opts.binary, &argv, timeout)
                .await?;
            if output.status.success() {
                return Ok(output);
            }

            let text = combined(&output);
            let code = output.status.code().unwrap_or(-1);
            let Some(reason) = opts.retry.match_retryable(&text) else {
                return Err(TerraformError::CommandFailed {
                    subcommand: sub.to_string(),
                    code,
                    output: text,
                }
                .into());
            };

            if attempt >= max_attempts {
                if max_attempts == 1 {
                    return Err(TerraformError::CommandFailed {
                        subcommand: sub.to_string(),
                        code,
                        output: text,
                    }
                    .into());
                }
                return Err(TerraformError::RetriesExhausted {
                    subcommand: sub.to_string(),
                    attempts: attempt,
                    reason: reason.to_string(),
                    output: text,
                }
                .into());
            }

            tracing::warn!(
                subcommand = %sub,
                attempt,
                reason,
                delay_ms = opts.retry.time_between_retries.as_millis(),
                "retryable terraform error, retrying"
            );
            tokio::time::sleep(opts.retry.time_between_retries).await;
        }
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(command_timeout: Duration, apply_timeout: Duration) -> Self {
        Self::new(
            TokioCommandRunner::new(command_timeout),
            command_timeout,
            apply_timeout,
        )
    }
}

impl<R: CommandRunner> Terraform for TerraformCli<R> {
    async fn init(&self, opts: &TerraformOptions) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Init, &opts.init_args())
            .await?;
        Ok(combined(&out))
    }

    async fn apply(&self, opts: &TerraformOptions) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Apply, &opts.apply_args())
            .await?;
        Ok(combined(&out))
    }

    async fn destroy(&self, opts: &TerraformOptions) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Destroy, &opts.destroy_args())
            .await?;
        Ok(combined(&out))
    }

    async fn validate(&self, opts: &TerraformOptions) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Validate, &opts.validate_args())
            .await?;
        Ok(combined(&out))
    }

    async fn plan(&self, opts: &TerraformOptions) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Plan, &opts.plan_args())
            .await?;
        Ok(combined(&out))
    }

    async fn show_plan(&self, opts: &TerraformOptions) -> Result<PlanStruct> {
        let args = opts.show_args()?;
        let out = self.run_command(opts, Subcommand::Show, &args).await?;
        Ok(PlanStruct::parse(&String::from_utf8_lossy(&out.stdout))?)
    }

    async fn output(&self, opts: &TerraformOptions, name: &str) -> Result<String> {
        let out = self
            .run_command(opts, Subcommand::Output, &opts.output_args(name))
            .await?;
        Ok(decode_output(name, &String::from_utf8_lossy(&out.stdout))?)
    }
}

/// `terraform_version` from JSON output, or the `Terraform vX.Y.Z` banner
/// older releases print instead.
fn parse_version(stdout: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(stdout) {
        return value["terraform_version"].as_str().map(String::from);
    }
    stdout
        .lines()
        .next()
        .and_then(|l| l.trim().strip_prefix("Terraform v"))
        .map(String::from)
}

/// Stdout followed by stderr, lossily decoded.
fn combined(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}
