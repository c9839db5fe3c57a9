//! Scoped teardown: destroy after a scenario body, whatever its outcome.

use std::future::Future;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, Terraform};
use crate::domain::TerraformOptions;

/// Await `body`, then run `terraform destroy` exactly once.
///
/// The body's error wins over a teardown error; a teardown failure after a
/// failed body is logged and reported as a warning so the original cause is
/// not masked.
///
/// # Errors
///
/// Returns the body's error, or the destroy error if only teardown failed.
pub async fn with_teardown<T>(
    tf: &impl Terraform,
    opts: &TerraformOptions,
    reporter: &impl ProgressReporter,
    body: impl Future<Output = Result<T>>,
) -> Result<T> {
    let outcome = body.await;

    reporter.step("destroying test resources...");
    tracing::info!(dir = %opts.terraform_dir.display(), "running teardown");
    let teardown = tf.destroy(opts).await.context("terraform destroy");

    match (outcome, teardown) {
        (Ok(value), Ok(_)) => {
            reporter.success("test resources destroyed");
            Ok(value)
        }
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(_)) => {
            reporter.success("test resources destroyed");
            Err(e)
        }
        (Err(e), Err(teardown_err)) => {
            tracing::error!(error = %format!("{teardown_err:#}"), "teardown failed after scenario failure");
            reporter.warn(&format!(
                "teardown failed, resources may remain: {teardown_err:#}"
            ));
            Err(e)
        }
    }
}
