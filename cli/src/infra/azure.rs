//! Infrastructure implementation of the `ResourceChecker` port.
//!
//! Existence queries go through the `az` CLI, which carries the ambient
//! Azure login context.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ResourceChecker};

/// Environment variable consulted when no subscription is configured.
pub const SUBSCRIPTION_ENV: &str = "ARM_SUBSCRIPTION_ID";

/// Stderr markers for a missing resource. A bare "not found" is not enough:
/// az also says it for unknown subscriptions and extensions.
const NOT_FOUND_MARKERS: &[&str] = &[
    "resourcenotfound",
    "resourcegroupnotfound",
    "could not be found",
];

/// Resource checker backed by `az`.
pub struct AzureCli<R: CommandRunner> {
    runner: R,
    binary: String,
    default_subscription: Option<String>,
}

impl<R: CommandRunner> AzureCli<R> {
    /// `default_subscription` applies to calls that pass no subscription.
    pub fn new(runner: R, binary: impl Into<String>, default_subscription: Option<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            default_subscription,
        }
    }

    /// Like `new`, with the default subscription taken from `ARM_SUBSCRIPTION_ID`.
    pub fn from_env(runner: R, binary: impl Into<String>) -> Self {
        let sub = std::env::var(SUBSCRIPTION_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self::new(runner, binary, sub)
    }

    /// The underlying command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn with_subscription<'a>(&'a self, args: &mut Vec<&'a str>, subscription: Option<&'a str>) {
        if let Some(sub) = subscription.or(self.default_subscription.as_deref()) {
            args.push("--subscription");
            args.push(sub);
        }
    }

    /// Run `az <resource> show`; exit 0 means the resource exists.
    async fn show_exists(
        &self,
        resource: &str,
        name: &str,
        resource_group: &str,
        subscription: Option<&str>,
    ) -> Result<bool> {
        let mut args = vec![
            resource,
            "show",
            "--name",
            name,
            "--resource-group",
            resource_group,
            "--output",
            "none",
        ];
        self.with_subscription(&mut args, subscription);
        let output = self
            .runner
            .run(&self.binary, &args)
            .await
            .with_context(|| format!("az {resource} show"))?;
        if output.status.success() {
            return Ok(true);
        }
        if is_not_found(&output) {
            tracing::debug!(resource, name, resource_group, "resource not found");
            return Ok(false);
        }
        anyhow::bail!(
            "az {resource} show failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )
    }
}

impl<R: CommandRunner> ResourceChecker for AzureCli<R> {
    async fn resource_group_exists(&self, name: &str, subscription: Option<&str>) -> Result<bool> {
        let mut args = vec!["group", "exists", "--name", name];
        self.with_subscription(&mut args, subscription);
        let output = self
            .runner
            .run(&self.binary, &args)
            .await
            .context("az group exists")?;
        if !output.status.success() {
            anyhow::bail!(
                "az group exists failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        match String::from_utf8_lossy(&output.stdout).trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => anyhow::bail!("unexpected 'az group exists' output: {other}"),
        }
    }

    async fn container_registry_exists(
        &self,
        name: &str,
        resource_group: &str,
        subscription: Option<&str>,
    ) -> Result<bool> {
        self.show_exists("acr", name, resource_group, subscription)
            .await
    }

    async fn managed_cluster_exists(
        &self,
        name: &str,
        resource_group: &str,
        subscription: Option<&str>,
    ) -> Result<bool> {
        self.show_exists("aks", name, resource_group, subscription)
            .await
    }
}

fn is_not_found(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m))
}
