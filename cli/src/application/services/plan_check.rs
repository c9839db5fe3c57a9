//! Application service: plan scenario.
//!
//! Plans the stack under unique names and requires every expected resource
//! address in the planned values. Nothing is applied.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Terraform};
use crate::application::services::lifecycle::{init_and_plan, init_and_plan_and_show};
use crate::domain::stack::EXPECTED_PLAN_ADDRESSES;
use crate::domain::{PlanStruct, StackNames, SuiteConfig, TerraformOptions};

/// Options for one plan run with the given suffix.
///
/// # Errors
///
/// Returns an error if the stack names or retry policy are invalid.
pub fn plan_options(config: &SuiteConfig, unique_id: &str) -> Result<TerraformOptions> {
    let names = StackNames::new(&config.stack.name_prefix, unique_id)?;
    Ok(config
        .terraform_options()?
        .with_vars(names.vars(&config.stack.location))
        .with_plan_file(&config.terraform.plan_file))
}

/// Run the plan scenario with a fresh unique suffix.
///
/// # Errors
///
/// Returns an error if planning fails or an expected address is absent.
pub async fn run(
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
) -> Result<PlanStruct> {
    let id = crate::domain::unique_id();
    let opts = plan_options(config, &id)?;
    tracing::info!(
        unique_id = %id,
        plan_file = ?opts.resolved_plan_file(),
        "plan scenario starting"
    );

    reporter.step("planning stack...");
    init_and_plan(tf, &opts).await?;
    let plan = init_and_plan_and_show(tf, &opts).await?;

    for address in EXPECTED_PLAN_ADDRESSES {
        plan.require_planned_value(address)?;
    }
    reporter.success(&format!(
        "plan contains all {} expected resources",
        EXPECTED_PLAN_ADDRESSES.len()
    ));
    Ok(plan)
}
