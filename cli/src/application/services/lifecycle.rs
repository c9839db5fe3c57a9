//! Composite terraform lifecycle steps.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::Terraform;
use crate::domain::{PlanStruct, TerraformOptions};

/// `init` then `apply`.
///
/// # Errors
///
/// Returns an error if either step fails.
pub async fn init_and_apply(tf: &impl Terraform, opts: &TerraformOptions) -> Result<String> {
    tf.init(opts).await.context("terraform init")?;
    tf.apply(opts).await.context("terraform apply")
}

/// `init` then `validate`.
///
/// # Errors
///
/// Returns an error if either step fails.
pub async fn init_and_validate(tf: &impl Terraform, opts: &TerraformOptions) -> Result<String> {
    tf.init(opts).await.context("terraform init")?;
    tf.validate(opts).await.context("terraform validate")
}

/// `init` then `plan`.
///
/// # Errors
///
/// Returns an error if either step fails.
pub async fn init_and_plan(tf: &impl Terraform, opts: &TerraformOptions) -> Result<String> {
    tf.init(opts).await.context("terraform init")?;
    tf.plan(opts).await.context("terraform plan")
}

/// `init`, `plan -out`, then `show -json` on the written plan.
///
/// # Errors
///
/// Returns an error if any step fails or the plan cannot be parsed.
pub async fn init_and_plan_and_show(
    tf: &impl Terraform,
    opts: &TerraformOptions,
) -> Result<PlanStruct> {
    init_and_plan(tf, opts).await?;
    tf.show_plan(opts).await.context("terraform show")
}
