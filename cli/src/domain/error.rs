//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Process errors ────────────────────────────────────────────────────────────

/// Failures of a child process before it produced an exit status.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} timed out after {}s and was killed", .timeout.as_secs())]
    TimedOut {
        program: String,
        timeout: std::time::Duration,
    },
}

// ── Terraform errors ──────────────────────────────────────────────────────────

/// Errors raised while driving the terraform binary.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform {subcommand} exited with code {code}:\n{output}")]
    CommandFailed {
        subcommand: String,
        code: i32,
        output: String,
    },

    #[error(
        "terraform {subcommand} still failing after {attempts} attempts ({reason}):\n{output}"
    )]
    RetriesExhausted {
        subcommand: String,
        attempts: u32,
        reason: String,
        output: String,
    },

    #[error("terraform output '{0}' is empty")]
    EmptyOutput(String),

    #[error("no plan file configured; set terraform.plan_file to run 'terraform show'")]
    MissingPlanFile,

    #[error("cannot parse terraform plan JSON: {0}")]
    InvalidPlan(String),
}

// ── Verification errors ───────────────────────────────────────────────────────

/// Post-condition failures: the infrastructure is not what the definition promised.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("resource group '{0}' does not exist")]
    ResourceGroupMissing(String),

    #[error("container registry '{name}' does not exist in resource group '{resource_group}'")]
    ContainerRegistryMissing {
        name: String,
        resource_group: String,
    },

    #[error("managed cluster '{name}' does not exist in resource group '{resource_group}'")]
    ManagedClusterMissing {
        name: String,
        resource_group: String,
    },

    #[error("planned values have no resource '{address}' (planned: {available})")]
    PlannedResourceMissing { address: String, available: String },

    #[error("cannot derive a registry name from login server '{0}'")]
    InvalidLoginServer(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Invalid container registry name '{0}': must be 5-50 ASCII letters or digits. \
         Shorten stack.name_prefix."
    )]
    InvalidRegistryName(String),

    #[error("Invalid retryable error pattern '{pattern}': {reason}")]
    InvalidRetryPattern { pattern: String, reason: String },

    #[error("Invalid value for {key}: must be greater than zero")]
    InvalidTimeout { key: String },
}
