//! Application service: run a selection of scenarios and collect a report.

use std::future::Future;

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{ProgressReporter, ResourceChecker, Terraform, WorkingCopies};
use crate::application::services::{plan_check, provision_check, validation_check};
use crate::domain::{RunReport, Scenario, ScenarioReport, SuiteConfig};

/// Run `scenarios` in order and report each outcome.
///
/// With `parallel`, the provisioning scenario runs in a private working copy
/// of the definition, concurrently with the remaining scenarios, which still
/// run in order among themselves. If the copy cannot be made, provisioning
/// runs after the others instead.
pub async fn run(
    tf: &impl Terraform,
    checker: &impl ResourceChecker,
    copies: &impl WorkingCopies,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
    scenarios: &[Scenario],
    parallel: bool,
) -> RunReport {
    let mut report = RunReport::default();

    if parallel && scenarios.contains(&Scenario::Provision) {
        let rest: Vec<Scenario> = scenarios
            .iter()
            .copied()
            .filter(|s| *s != Scenario::Provision)
            .collect();
        let (provision, others) = match copies.copy_definition(&config.terraform.dir) {
            Ok((dir, _guard)) => {
                tracing::info!(dir = %dir.display(), "provisioning in working copy");
                let mut isolated = config.clone();
                isolated.terraform.dir = dir;
                tokio::join!(
                    run_one(tf, checker, reporter, &isolated, Scenario::Provision),
                    run_sequential(tf, checker, reporter, config, &rest),
                )
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "no working copy, provisioning last");
                reporter.warn(&format!("running sequentially: {e:#}"));
                let others = run_sequential(tf, checker, reporter, config, &rest).await;
                let provision = run_one(tf, checker, reporter, config, Scenario::Provision).await;
                (provision, others)
            }
        };
        report.scenarios.extend(others);
        report.scenarios.push(provision);
    } else {
        report.scenarios = run_sequential(tf, checker, reporter, config, scenarios).await;
    }

    tracing::info!(
        scenarios = report.scenarios.len(),
        failed = report.failed_count(),
        "run finished"
    );
    report
}

async fn run_sequential(
    tf: &impl Terraform,
    checker: &impl ResourceChecker,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
    scenarios: &[Scenario],
) -> Vec<ScenarioReport> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        reports.push(run_one(tf, checker, reporter, config, *scenario).await);
    }
    reports
}

async fn run_one(
    tf: &impl Terraform,
    checker: &impl ResourceChecker,
    reporter: &impl ProgressReporter,
    config: &SuiteConfig,
    scenario: Scenario,
) -> ScenarioReport {
    match scenario {
        Scenario::Provision => {
            timed(scenario, provision_check::run(tf, checker, reporter, config)).await
        }
        Scenario::Validate => timed(scenario, validation_check::run(tf, reporter, config)).await,
        Scenario::Plan => timed(scenario, plan_check::run(tf, reporter, config)).await,
    }
}

async fn timed<T>(scenario: Scenario, fut: impl Future<Output = Result<T>>) -> ScenarioReport {
    let started_at = Utc::now();
    let result = fut.await;
    if let Err(e) = &result {
        tracing::warn!(%scenario, error = %format!("{e:#}"), "scenario failed");
    }
    ScenarioReport::from_result(scenario, started_at, Utc::now(), &result)
}
