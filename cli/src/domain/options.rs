//! Terraform invocation options and argument formatting.
//!
//! Pure functions only. The argument vectors built here are handed to a
//! `CommandRunner` by the infrastructure layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::error::TerraformError;
use crate::domain::retry::RetryPolicy;

/// Default name of the terraform binary on `PATH`.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Terraform subcommands driven by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Init,
    Apply,
    Destroy,
    Validate,
    Plan,
    Show,
    Output,
}

impl Subcommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Apply => "apply",
            Self::Destroy => "destroy",
            Self::Validate => "validate",
            Self::Plan => "plan",
            Self::Show => "show",
            Self::Output => "output",
        }
    }

    /// Subcommands that create, change, or compute real infrastructure and
    /// therefore run under the long timeout.
    #[must_use]
    pub fn is_long_running(self) -> bool {
        matches!(self, Self::Apply | Self::Destroy | Self::Plan)
    }
}

impl std::fmt::Display for Subcommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything terraform needs to know about one scenario run.
///
/// Constructed fresh per scenario and only borrowed afterwards.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory holding the `.tf` definition.
    pub terraform_dir: PathBuf,
    /// Input variables passed as `-var name=value`.
    pub vars: BTreeMap<String, String>,
    /// Where `plan -out` writes the plan, relative to `terraform_dir` unless absolute.
    pub plan_file_path: Option<PathBuf>,
    /// Retryable errors and retry counts.
    pub retry: RetryPolicy,
    /// Terraform binary name or path.
    pub binary: String,
    /// Pass `-no-color` to commands that accept it.
    pub no_color: bool,
}

impl TerraformOptions {
    #[must_use]
    pub fn new(terraform_dir: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            vars: BTreeMap::new(),
            plan_file_path: None,
            retry,
            binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            no_color: true,
        }
    }

    #[must_use]
    pub fn with_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    #[must_use]
    pub fn with_plan_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.plan_file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    #[must_use]
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Location of the plan file as seen from the current process.
    #[must_use]
    pub fn resolved_plan_file(&self) -> Option<PathBuf> {
        self.plan_file_path
            .as_deref()
            .map(|p| resolve_against(&self.terraform_dir, p))
    }

    // ── Argument formatting ──────────────────────────────────────────────────

    #[must_use]
    pub fn init_args(&self) -> Vec<String> {
        let mut args = self.base(Subcommand::Init);
        args.extend(["-upgrade=false".to_string(), "-input=false".to_string()]);
        self.push_no_color(&mut args);
        args
    }

    #[must_use]
    pub fn apply_args(&self) -> Vec<String> {
        let mut args = self.base(Subcommand::Apply);
        args.extend(["-input=false".to_string(), "-auto-approve".to_string()]);
        self.push_no_color(&mut args);
        self.push_vars(&mut args);
        args
    }

    #[must_use]
    pub fn destroy_args(&self) -> Vec<String> {
        let mut args = self.base(Subcommand::Destroy);
        args.extend(["-input=false".to_string(), "-auto-approve".to_string()]);
        self.push_no_color(&mut args);
        self.push_vars(&mut args);
        args
    }

    #[must_use]
    pub fn validate_args(&self) -> Vec<String> {
        let mut args = self.base(Subcommand::Validate);
        self.push_no_color(&mut args);
        args
    }

    #[must_use]
    pub fn plan_args(&self) -> Vec<String> {
        let mut args = self.base(Subcommand::Plan);
        args.extend(["-input=false".to_string(), "-lock=false".to_string()]);
        self.push_no_color(&mut args);
        self.push_vars(&mut args);
        if let Some(path) = &self.plan_file_path {
            args.push(format!("-out={}", path.display()));
        }
        args
    }

    /// `show -json <plan>`; terraform resolves the plan path after `-chdir`.
    ///
    /// # Errors
    ///
    /// Returns `TerraformError::MissingPlanFile` when no plan path is configured.
    pub fn show_args(&self) -> Result<Vec<String>, TerraformError> {
        let path = self
            .plan_file_path
            .as_ref()
            .ok_or(TerraformError::MissingPlanFile)?;
        let mut args = self.base(Subcommand::Show);
        args.extend([
            "-json".to_string(),
            path.display().to_string(),
        ]);
        Ok(args)
    }

    #[must_use]
    pub fn output_args(&self, name: &str) -> Vec<String> {
        let mut args = self.base(Subcommand::Output);
        args.extend(["-json".to_string(), name.to_string()]);
        args
    }

    fn base(&self, sub: Subcommand) -> Vec<String> {
        vec![
            format!("-chdir={}", self.terraform_dir.display()),
            sub.as_str().to_string(),
        ]
    }

    fn push_no_color(&self, args: &mut Vec<String>) {
        if self.no_color {
            args.push("-no-color".to_string());
        }
    }

    fn push_vars(&self, args: &mut Vec<String>) {
        for (name, value) in &self.vars {
            args.push("-var".to_string());
            args.push(format!("{name}={value}"));
        }
    }
}

fn resolve_against(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Decode the JSON printed by `terraform output -json <name>`.
///
/// Strings are returned verbatim; any other JSON value is returned in
/// compact JSON form.
///
/// # Errors
///
/// Returns `TerraformError::EmptyOutput` for an empty string, `null`, or
/// unparseable output.
pub fn decode_output(name: &str, stdout: &str) -> Result<String, TerraformError> {
    let value: serde_json::Value = serde_json::from_str(stdout.trim())
        .map_err(|_| TerraformError::EmptyOutput(name.to_string()))?;
    let text = match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        return Err(TerraformError::EmptyOutput(name.to_string()));
    }
    Ok(text)
}
