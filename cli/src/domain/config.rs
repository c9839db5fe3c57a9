//! Domain types for tfcheck configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::options::{DEFAULT_TERRAFORM_BINARY, TerraformOptions};
use crate::domain::retry::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRYABLE_ERRORS, DEFAULT_TIME_BETWEEN_RETRIES, RetryPolicy,
};
use crate::domain::stack::{DEFAULT_LOCATION, DEFAULT_NAME_PREFIX};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, usually read from `tfcheck.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuiteConfig {
    pub terraform: TerraformConfig,
    pub retry: RetryConfig,
    pub stack: StackConfig,
    pub azure: AzureConfig,
}

/// Where the definition lives and how terraform is run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformConfig {
    /// Directory holding the `.tf` files.
    pub dir: PathBuf,
    /// Terraform binary name or path.
    pub binary: String,
    /// Plan file used by the plan scenario, relative to `dir`.
    pub plan_file: PathBuf,
    /// Pass `-no-color` to terraform.
    pub no_color: bool,
    /// Timeout for init/validate/output/show.
    pub command_timeout_secs: u64,
    /// Timeout for apply/destroy/plan.
    pub apply_timeout_secs: u64,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".."),
            binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            plan_file: PathBuf::from("../test.tfplan"),
            no_color: true,
            command_timeout_secs: 300,
            apply_timeout_secs: 5400,
        }
    }
}

/// Retry settings. `extra_errors` are appended to the built-in set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub time_between_retries_secs: u64,
    pub extra_errors: BTreeMap<String, String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            time_between_retries_secs: DEFAULT_TIME_BETWEEN_RETRIES.as_secs(),
            extra_errors: BTreeMap::new(),
        }
    }
}

/// Naming of the stack under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub name_prefix: String,
    pub location: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

/// How resource existence is queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub binary: String,
    /// Subscription for existence checks; `None` uses `ARM_SUBSCRIPTION_ID`
    /// or the ambient `az` context.
    pub subscription_id: Option<String>,
    pub command_timeout_secs: u64,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            binary: "az".to_string(),
            subscription_id: None,
            command_timeout_secs: 120,
        }
    }
}

// ── Derived values ───────────────────────────────────────────────────────────

impl SuiteConfig {
    /// Check values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("terraform.command_timeout_secs", self.terraform.command_timeout_secs),
            ("terraform.apply_timeout_secs", self.terraform.apply_timeout_secs),
            ("azure.command_timeout_secs", self.azure.command_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidTimeout {
                    key: key.to_string(),
                });
            }
        }
        self.retry_policy().map(|_| ())
    }

    /// Built-in retryable errors plus `retry.extra_errors`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRetryPattern` for a bad extra pattern.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let patterns = DEFAULT_RETRYABLE_ERRORS.iter().copied().chain(
            self.retry
                .extra_errors
                .iter()
                .map(|(p, r)| (p.as_str(), r.as_str())),
        );
        RetryPolicy::from_patterns(
            patterns,
            self.retry.max_retries,
            Duration::from_secs(self.retry.time_between_retries_secs),
        )
    }

    /// Base terraform options with no variables and no plan file.
    ///
    /// # Errors
    ///
    /// Returns an error if the retry policy cannot be built.
    pub fn terraform_options(&self) -> Result<TerraformOptions, ConfigError> {
        Ok(TerraformOptions::new(&self.terraform.dir, self.retry_policy()?)
            .with_binary(&self.terraform.binary)
            .with_no_color(self.terraform.no_color))
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.terraform.command_timeout_secs)
    }

    #[must_use]
    pub fn apply_timeout(&self) -> Duration {
        Duration::from_secs(self.terraform.apply_timeout_secs)
    }

    #[must_use]
    pub fn azure_timeout(&self) -> Duration {
        Duration::from_secs(self.azure.command_timeout_secs)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
