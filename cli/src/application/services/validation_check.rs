//! Application service: validation-only scenario.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Terraform};
use crate::application::services::lifecycle::init_and_validate;
use crate::domain::SuiteConfig;

/// Run `init` + `validate` with no variables. Creates nothing.
///
/// # Errors
///
/// Returns an error if the definition does not validate.
pub async fn run(
    tf: &impl Terraform,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
) -> Result<()> {
    let opts = config.terraform_options()?;
    tracing::info!(dir = %opts.terraform_dir.display(), "validate scenario starting");

    reporter.step("validating definition...");
    init_and_validate(tf, &opts).await?;
    reporter.success("definition is valid");
    Ok(())
}
