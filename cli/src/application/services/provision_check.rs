//! Application service: end-to-end provisioning scenario.
//!
//! Applies the stack under unique names, checks the outputs against the
//! cloud provider, and always destroys what it created.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ResourceChecker, Terraform};
use crate::application::services::lifecycle::init_and_apply;
use crate::application::services::teardown::with_teardown;
use crate::domain::error::VerificationError;
use crate::domain::stack::{
    OUTPUT_ACR_LOGIN_SERVER, OUTPUT_AKS_CLUSTER, OUTPUT_RESOURCE_GROUP,
    registry_name_from_login_server,
};
use crate::domain::{StackNames, SuiteConfig, TerraformOptions};

/// What the provisioning scenario verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub names: StackNames,
    pub resource_group: String,
    pub registry: String,
    pub cluster: String,
}

/// Options for one provisioning run with the given suffix.
///
/// # Errors
///
/// Returns an error if the stack names or retry policy are invalid.
pub fn provision_options(config: &SuiteConfig, unique_id: &str) -> Result<(StackNames, TerraformOptions)> {
    let names = StackNames::new(&config.stack.name_prefix, unique_id)?;
    let opts = config
        .terraform_options()?
        .with_vars(names.vars(&config.stack.location));
    Ok((names, opts))
}

/// Run the provisioning scenario with a fresh unique suffix.
///
/// # Errors
///
/// Returns an error if apply fails, an output is empty, a resource does not
/// exist, or teardown fails.
pub async fn run(
    tf: &impl Terraform,
    checker: &impl ResourceChecker,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
) -> Result<ProvisionOutcome> {
    let id = crate::domain::unique_id();
    let (names, opts) = provision_options(config, &id)?;
    tracing::info!(unique_id = %id, resource_group = %names.resource_group, "provision scenario starting");

    let subscription = config.azure.subscription_id.as_deref();
    let body = apply_and_verify(tf, checker, reporter, &opts, &names, subscription);
    with_teardown(tf, &opts, reporter, body).await
}

async fn apply_and_verify(
    tf: &impl Terraform,
    checker: &impl ResourceChecker,
    reporter: &impl ProgressReporter,
    opts: &TerraformOptions,
    names: &StackNames,
    subscription: Option<&str>,
) -> Result<ProvisionOutcome> {
    reporter.step(&format!("applying stack '{}'...", names.resource_group));
    init_and_apply(tf, opts).await?;
    reporter.success("stack applied");

    let resource_group = tf.output(opts, OUTPUT_RESOURCE_GROUP).await?;
    let login_server = tf.output(opts, OUTPUT_ACR_LOGIN_SERVER).await?;
    let cluster = tf.output(opts, OUTPUT_AKS_CLUSTER).await?;

    reporter.step("verifying resources exist...");
    if !checker
        .resource_group_exists(&resource_group, subscription)
        .await
        .context("checking resource group")?
    {
        return Err(VerificationError::ResourceGroupMissing(resource_group).into());
    }

    let registry = registry_name_from_login_server(&login_server)?;
    if !checker
        .container_registry_exists(&registry, &resource_group, subscription)
        .await
        .context("checking container registry")?
    {
        return Err(VerificationError::ContainerRegistryMissing {
            name: registry,
            resource_group,
        }
        .into());
    }

    if !checker
        .managed_cluster_exists(&cluster, &resource_group, subscription)
        .await
        .context("checking managed cluster")?
    {
        return Err(VerificationError::ManagedClusterMissing {
            name: cluster,
            resource_group,
        }
        .into());
    }
    reporter.success("resource group, registry, and cluster exist");

    Ok(ProvisionOutcome {
        names: names.clone(),
        resource_group,
        registry,
        cluster,
    })
}
