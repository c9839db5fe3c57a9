//! Unit tests for the end-to-end provisioning scenario and its teardown.

#![allow(clippy::expect_used)]

use tfcheck::application::services::provision_check;
use tfcheck::domain::VerificationError;

use crate::helpers::{FakeChecker, FakeTerraform, RecordingReporter, fast_config};

#[tokio::test]
async fn healthy_stack_is_applied_verified_and_destroyed() {
    let tf = FakeTerraform::healthy("abc123");
    let checker = FakeChecker::all_present();
    let reporter = RecordingReporter::default();

    let outcome = provision_check::run(&tf, &checker, &reporter, &fast_config())
        .await
        .expect("scenario passes");

    assert_eq!(
        tf.calls(),
        vec!["init", "apply", "output", "output", "output", "destroy"]
    );
    assert_eq!(outcome.resource_group, "casino-test-rg-abc123");
    assert_eq!(outcome.registry, "casinotestacrabc123");
    assert_eq!(outcome.cluster, "casino-test-aks-abc123");
    assert_eq!(
        checker.calls(),
        vec![
            ("group".to_string(), "casino-test-rg-abc123".to_string()),
            ("registry".to_string(), "casinotestacrabc123".to_string()),
            ("cluster".to_string(), "casino-test-aks-abc123".to_string()),
        ]
    );
}

#[tokio::test]
async fn apply_vars_carry_unique_names_and_location() {
    let tf = FakeTerraform::healthy("abc123");
    let reporter = RecordingReporter::default();

    provision_check::run(&tf, &FakeChecker::all_present(), &reporter, &fast_config())
        .await
        .expect("scenario passes");

    let vars = &tf.seen_vars()[1];
    assert_eq!(vars["location"], "East US");
    assert!(vars["resource_group_name"].starts_with("casino-test-rg-"));
    assert!(vars["acr_name"].starts_with("casinotestacr"));
    assert!(vars["aks_cluster_name"].starts_with("casino-test-aks-"));
    // destroy sees the same variables as apply
    assert_eq!(tf.seen_vars().last(), Some(vars));
}

#[tokio::test]
async fn apply_failure_still_destroys_once() {
    let tf = FakeTerraform::healthy("abc123").failing_on("apply");
    let checker = FakeChecker::all_present();
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &checker, &reporter, &fast_config())
        .await
        .expect_err("apply fails");

    assert!(format!("{err:#}").contains("terraform apply"), "got: {err:#}");
    assert_eq!(tf.count("destroy"), 1);
    assert!(checker.calls().is_empty());
}

#[tokio::test]
async fn missing_registry_fails_and_destroys_once() {
    let tf = FakeTerraform::healthy("abc123");
    let checker = FakeChecker {
        registry: false,
        ..FakeChecker::all_present()
    };
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &checker, &reporter, &fast_config())
        .await
        .expect_err("registry missing");

    assert!(matches!(
        err.downcast_ref::<VerificationError>(),
        Some(VerificationError::ContainerRegistryMissing { name, .. }) if name == "casinotestacrabc123"
    ));
    assert_eq!(tf.count("destroy"), 1);
    // cluster is not checked after the registry check fails
    assert_eq!(checker.calls().len(), 2);
}

#[tokio::test]
async fn missing_resource_group_fails() {
    let tf = FakeTerraform::healthy("abc123");
    let checker = FakeChecker {
        group: false,
        ..FakeChecker::all_present()
    };
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &checker, &reporter, &fast_config())
        .await
        .expect_err("group missing");
    assert!(err.to_string().contains("does not exist"), "got: {err}");
    assert_eq!(tf.count("destroy"), 1);
}

#[tokio::test]
async fn missing_cluster_fails() {
    let tf = FakeTerraform::healthy("abc123");
    let checker = FakeChecker {
        cluster: false,
        ..FakeChecker::all_present()
    };
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &checker, &reporter, &fast_config())
        .await
        .expect_err("cluster missing");
    assert!(matches!(
        err.downcast_ref::<VerificationError>(),
        Some(VerificationError::ManagedClusterMissing { .. })
    ));
    assert_eq!(tf.count("destroy"), 1);
}

#[tokio::test]
async fn empty_output_fails_and_destroys_once() {
    let mut tf = FakeTerraform::healthy("abc123");
    tf.outputs.insert("acr_login_server", String::new());
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &FakeChecker::all_present(), &reporter, &fast_config())
        .await
        .expect_err("empty output");
    assert!(err.to_string().contains("acr_login_server"), "got: {err}");
    assert_eq!(tf.count("destroy"), 1);
}

#[tokio::test]
async fn destroy_failure_after_success_is_reported() {
    let tf = FakeTerraform::healthy("abc123").failing_on("destroy");
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &FakeChecker::all_present(), &reporter, &fast_config())
        .await
        .expect_err("destroy fails");
    assert!(format!("{err:#}").contains("terraform destroy"), "got: {err:#}");
    assert_eq!(tf.count("destroy"), 1);
}

#[tokio::test]
async fn destroy_failure_does_not_mask_scenario_failure() {
    let tf = FakeTerraform::healthy("abc123")
        .failing_on("apply")
        .failing_on("destroy");
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &FakeChecker::all_present(), &reporter, &fast_config())
        .await
        .expect_err("both fail");
    assert!(format!("{err:#}").contains("terraform apply"), "got: {err:#}");
    assert_eq!(tf.count("destroy"), 1);
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("teardown failed"), "got: {warnings:?}");
}

#[tokio::test]
async fn invalid_prefix_fails_before_terraform_runs() {
    let tf = FakeTerraform::healthy("abc123");
    let mut cfg = fast_config();
    cfg.stack.name_prefix = "casino_test".to_string();
    let reporter = RecordingReporter::default();

    let err = provision_check::run(&tf, &FakeChecker::all_present(), &reporter, &cfg)
        .await
        .expect_err("invalid registry name");
    assert!(err.to_string().contains("Invalid container registry name"), "got: {err}");
    assert!(tf.calls().is_empty());
}
