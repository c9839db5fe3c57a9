//! Integration tests for `apply`, `validate`, `plan`, `all`, and `version`.
//!
//! Each test writes stand-in `terraform` and `az` shell scripts into a temp
//! dir, points a config file at them, and inspects the call log the fake
//! terraform leaves behind.

#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_TERRAFORM: &str = r#"#!/bin/sh
if [ "$1" = "version" ]; then
  echo '{"terraform_version":"1.9.5"}'
  exit 0
fi
echo "$*" >> "__DIR__/calls.log"
case "$2" in
  validate)
    if [ -n "$FAKE_INVALID" ]; then
      echo "Error: Unsupported block type" >&2
      exit 1
    fi
    ;;
  apply)
    if [ -n "$FAKE_APPLY_FAIL" ]; then
      echo "Error: creating Resource Group: AuthorizationFailed" >&2
      exit 1
    fi
    ;;
  output)
    case "$4" in
      resource_group_name) echo '"casino-test-rg-abc123"' ;;
      acr_login_server) echo '"casinotestacrabc123.azurecr.io"' ;;
      aks_cluster_name) echo '"casino-test-aks-abc123"' ;;
    esac
    ;;
  show)
    cat "__DIR__/plan.json"
    ;;
esac
exit 0
"#;

const FAKE_AZ: &str = r#"#!/bin/sh
echo "$*" >> "__DIR__/az.log"
if [ "$1" = "group" ]; then
  echo "${FAKE_GROUP:-true}"
fi
exit 0
"#;

const PLAN_JSON: &str = r#"{
  "format_version": "1.2",
  "planned_values": {
    "root_module": {
      "resources": [
        {"address": "azurerm_resource_group.main", "mode": "managed", "type": "azurerm_resource_group", "name": "main", "values": {}},
        {"address": "azurerm_container_registry.main", "mode": "managed", "type": "azurerm_container_registry", "name": "main", "values": {}},
        {"address": "azurerm_kubernetes_cluster.main", "mode": "managed", "type": "azurerm_kubernetes_cluster", "name": "main", "values": {}},
        {"address": "azurerm_log_analytics_workspace.main", "mode": "managed", "type": "azurerm_log_analytics_workspace", "name": "main", "values": {}}
      ]
    }
  },
  "resource_changes": []
}"#;

/// Temp dir holding the fake binaries, their logs, and a config file.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().display().to_string();
        write_script(&dir.path().join("terraform"), &FAKE_TERRAFORM.replace("__DIR__", &root));
        write_script(&dir.path().join("az"), &FAKE_AZ.replace("__DIR__", &root));
        std::fs::write(dir.path().join("plan.json"), PLAN_JSON).expect("write plan");
        let config = format!(
            "terraform:\n  dir: {root}\n  binary: {root}/terraform\n  plan_file: test.tfplan\n\
             retry:\n  time_between_retries_secs: 0\n\
             azure:\n  binary: {root}/az\n"
        );
        std::fs::write(dir.path().join("tfcheck.yaml"), config).expect("write config");
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("tfcheck.yaml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfcheck"));
        cmd.env("NO_COLOR", "1")
            .env_remove("ARM_SUBSCRIPTION_ID")
            .arg("--config")
            .arg(self.config());
        cmd
    }

    /// Terraform invocations as logged by the fake binary.
    fn terraform_calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("calls.log"))
    }

    fn az_calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("az.log"))
    }

    /// How many logged terraform calls ran `sub`.
    fn count(&self, sub: &str) -> usize {
        self.terraform_calls()
            .iter()
            .filter(|l| l.split_whitespace().nth(1) == Some(sub))
            .count()
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(String::from).collect())
        .unwrap_or_default()
}

fn json_stdout(cmd: &mut Command) -> (Option<i32>, serde_json::Value) {
    let output = cmd.output().expect("run tfcheck");
    let value = serde_json::from_slice(&output.stdout).expect("valid json on stdout");
    (output.status.code(), value)
}

// --- validate ---

#[test]
fn test_validate_passes_and_creates_nothing() {
    let sb = Sandbox::new();
    sb.cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1 scenarios passed"));

    assert_eq!(sb.count("init"), 1);
    assert_eq!(sb.count("validate"), 1);
    assert_eq!(sb.count("apply"), 0);
    assert_eq!(sb.count("destroy"), 0);
}

#[test]
fn test_validate_reports_terraform_error() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["validate", "--json"]).env("FAKE_INVALID", "1"));

    assert_eq!(code, Some(1));
    assert_eq!(v["passed"], false);
    assert_eq!(v["scenarios"][0]["scenario"], "validate");
    let error = v["scenarios"][0]["error"].as_str().expect("error message");
    assert!(error.contains("Unsupported block type"), "got: {error}");
}

// --- apply ---

#[test]
fn test_apply_verifies_resources_and_destroys_once() {
    let sb = Sandbox::new();
    sb.cmd().arg("apply").assert().success();

    let subs: Vec<String> = sb
        .terraform_calls()
        .iter()
        .filter_map(|l| l.split_whitespace().nth(1).map(String::from))
        .collect();
    assert_eq!(
        subs,
        ["init", "apply", "output", "output", "output", "destroy"]
    );

    let az = sb.az_calls();
    assert_eq!(az.len(), 3);
    assert!(az[0].starts_with("group exists --name casino-test-rg-abc123"));
    assert!(az[1].starts_with("acr show --name casinotestacrabc123"));
    assert!(az[2].starts_with("aks show --name casino-test-aks-abc123"));
}

#[test]
fn test_apply_passes_unique_names_as_vars() {
    let sb = Sandbox::new();
    sb.cmd().arg("apply").assert().success();

    let apply = sb
        .terraform_calls()
        .into_iter()
        .find(|l| l.split_whitespace().nth(1) == Some("apply"))
        .expect("apply logged");
    assert!(apply.contains("-auto-approve"), "got: {apply}");
    assert!(apply.contains("resource_group_name=casino-test-rg-"), "got: {apply}");
    assert!(apply.contains("acr_name=casinotestacr"), "got: {apply}");
    assert!(apply.contains("location=East US"), "got: {apply}");
}

#[test]
fn test_apply_failure_still_destroys() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["apply", "--json"]).env("FAKE_APPLY_FAIL", "1"));

    assert_eq!(code, Some(1));
    assert_eq!(v["scenarios"][0]["passed"], false);
    assert_eq!(sb.count("destroy"), 1);
    assert_eq!(sb.count("output"), 0);
}

#[test]
fn test_missing_resource_group_fails_and_destroys() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["apply", "--json"]).env("FAKE_GROUP", "false"));

    assert_eq!(code, Some(1));
    let error = v["scenarios"][0]["error"].as_str().expect("error message");
    assert!(error.contains("casino-test-rg-abc123"), "got: {error}");
    assert_eq!(sb.count("destroy"), 1);
}

// --- plan ---

#[test]
fn test_plan_writes_and_reads_plan_file() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["plan", "--json"]));

    assert_eq!(code, Some(0));
    assert_eq!(v["passed"], true);
    let calls = sb.terraform_calls();
    assert!(calls.iter().any(|l| l.contains("plan") && l.contains("-out=test.tfplan")));
    assert!(calls.iter().any(|l| l.ends_with("show -json test.tfplan")));
    assert_eq!(sb.count("apply"), 0);
}

// --- all ---

#[test]
fn test_all_runs_every_scenario_in_order() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["all", "--json"]));

    assert_eq!(code, Some(0));
    let order: Vec<&str> = v["scenarios"]
        .as_array()
        .expect("scenarios array")
        .iter()
        .filter_map(|s| s["scenario"].as_str())
        .collect();
    assert_eq!(order, ["validate", "plan", "provision"]);
    assert_eq!(sb.count("destroy"), 1);
}

#[test]
fn test_all_parallel_reports_every_scenario() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["all", "--parallel", "--json"]));

    assert_eq!(code, Some(0));
    assert_eq!(v["scenarios"].as_array().map(Vec::len), Some(3));
    assert_eq!(sb.count("destroy"), 1);
}

#[test]
fn test_all_parallel_provisions_in_separate_directory() {
    let sb = Sandbox::new();
    sb.cmd().args(["all", "--parallel"]).assert().success();

    let chdir_of = |sub: &str| -> Vec<String> {
        sb.terraform_calls()
            .iter()
            .filter(|l| l.split_whitespace().nth(1) == Some(sub))
            .filter_map(|l| l.split_whitespace().next().map(String::from))
            .collect()
    };
    let own = format!("-chdir={}", sb.dir.path().display());

    assert_eq!(chdir_of("validate"), vec![own.clone()]);
    assert_eq!(chdir_of("plan"), vec![own.clone()]);
    let apply = chdir_of("apply");
    let destroy = chdir_of("destroy");
    assert_eq!(apply.len(), 1);
    assert_ne!(apply[0], own, "apply must not share the definition dir");
    assert_eq!(apply, destroy);
}

// --- version ---

#[test]
fn test_version_reports_configured_terraform() {
    let sb = Sandbox::new();
    sb.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tfcheck 0.1.0"))
        .stdout(predicate::str::contains("terraform 1.9.5"));
}

#[test]
fn test_version_json_includes_terraform_version() {
    let sb = Sandbox::new();
    let (code, v) = json_stdout(sb.cmd().args(["version", "--json"]));

    assert_eq!(code, Some(0));
    assert_eq!(v["version"], "0.1.0");
    assert_eq!(v["terraform"], "1.9.5");
}

#[test]
fn test_version_without_terraform_still_succeeds() {
    let sb = Sandbox::new();
    std::fs::remove_file(sb.dir.path().join("terraform")).expect("remove fake");
    let (code, v) = json_stdout(sb.cmd().args(["version", "--json"]));

    assert_eq!(code, Some(0));
    assert_eq!(v["version"], "0.1.0");
    assert!(v["terraform"].is_null());
}
