//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{PlanStruct, TerraformOptions};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Terraform Port ────────────────────────────────────────────────────────────

/// Terraform lifecycle operations.
///
/// Every method fails when terraform exits non-zero after the retries allowed
/// by `opts.retry`. Successful methods return terraform's combined output.
#[allow(async_fn_in_trait)]
pub trait Terraform {
    /// `terraform init`.
    async fn init(&self, opts: &TerraformOptions) -> Result<String>;
    /// `terraform apply -auto-approve` with the configured variables.
    async fn apply(&self, opts: &TerraformOptions) -> Result<String>;
    /// `terraform destroy -auto-approve` with the configured variables.
    async fn destroy(&self, opts: &TerraformOptions) -> Result<String>;
    /// `terraform validate`.
    async fn validate(&self, opts: &TerraformOptions) -> Result<String>;
    /// `terraform plan`, writing the plan file when one is configured.
    async fn plan(&self, opts: &TerraformOptions) -> Result<String>;
    /// `terraform show -json` on the configured plan file.
    async fn show_plan(&self, opts: &TerraformOptions) -> Result<PlanStruct>;
    /// `terraform output -json <name>`; empty values are an error.
    async fn output(&self, opts: &TerraformOptions, name: &str) -> Result<String>;
}

// ── Resource Checker Port ─────────────────────────────────────────────────────

/// Existence queries against the cloud provider.
///
/// `subscription` of `None` means "whatever the environment selects".
#[allow(async_fn_in_trait)]
pub trait ResourceChecker {
    async fn resource_group_exists(&self, name: &str, subscription: Option<&str>) -> Result<bool>;

    async fn container_registry_exists(
        &self,
        name: &str,
        resource_group: &str,
        subscription: Option<&str>,
    ) -> Result<bool>;

    async fn managed_cluster_exists(
        &self,
        name: &str,
        resource_group: &str,
        subscription: Option<&str>,
    ) -> Result<bool>;
}

// ── Working Copy Port ─────────────────────────────────────────────────────────

/// Private copies of a terraform definition, so scenarios running at the same
/// time never share `.terraform/`, the lock file, state, or plan files.
pub trait WorkingCopies {
    /// Copy the definition in `dir` into a fresh directory.
    ///
    /// Returns `(path, guard)` where `path` is the copy and `guard` deletes
    /// it when dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy cannot be created.
    fn copy_definition(&self, dir: &Path) -> Result<(PathBuf, Box<dyn Any + Send>)>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
