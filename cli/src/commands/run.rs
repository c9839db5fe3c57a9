//! Scenario commands: `apply`, `validate`, `plan`, `all`.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::suite;
use crate::domain::Scenario;
use crate::output::HumanRenderer;

/// Order used by `tfcheck all`: cheapest first.
pub const ALL: [Scenario; 3] = [Scenario::Validate, Scenario::Plan, Scenario::Provision];

/// Arguments for the all command.
#[derive(Args)]
pub struct AllArgs {
    /// Run the apply scenario in a working copy, alongside validate and plan
    #[arg(long)]
    pub parallel: bool,
}

/// Run `scenarios` and render the report.
///
/// Returns whether every scenario passed.
///
/// # Errors
///
/// Returns an error only if the report cannot be rendered.
pub async fn run(app: &AppContext, scenarios: &[Scenario], parallel: bool) -> Result<bool> {
    if !app.is_json() {
        app.output.kv(
            "Terraform dir:",
            &app.config.terraform.dir.display().to_string(),
        );
    }

    let reporter = app.reporter();
    let report = suite::run(
        &app.terraform,
        &app.azure,
        &app.working_copies,
        &reporter,
        &app.config,
        scenarios,
        parallel,
    )
    .await;

    if app.is_json() {
        println!("{}", crate::output::json::format_report(&report)?);
    } else {
        HumanRenderer::new(&app.output).render_report(&report);
    }
    Ok(report.passed())
}
