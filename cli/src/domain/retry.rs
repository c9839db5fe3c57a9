//! Retryable terraform errors.
//!
//! Pure matching logic only. The retry loop that sleeps between attempts
//! lives with the terraform adapter in `crate::infra::terraform`.

use std::time::Duration;

use regex::Regex;

use crate::domain::error::ConfigError;

/// Retries allowed after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Pause between attempts.
pub const DEFAULT_TIME_BETWEEN_RETRIES: Duration = Duration::from_secs(5);

const PLUGIN_NETWORK_ERROR: &str = "Failed to retrieve plugin due to transient network error.";

/// Known-transient terraform failures, as `(pattern, reason)` pairs.
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        ".*read: connection reset by peer.*",
        "Failed to reach helm charts repository.",
    ),
    (".*transport is closing.*", "Failed to reach Kubernetes API."),
    (".*unable to verify signature.*", PLUGIN_NETWORK_ERROR),
    (".*unable to verify checksum.*", PLUGIN_NETWORK_ERROR),
    (".*no provider exists with the given name.*", PLUGIN_NETWORK_ERROR),
    (".*registry service is unreachable.*", PLUGIN_NETWORK_ERROR),
    (".*Error installing provider.*", PLUGIN_NETWORK_ERROR),
    (".*Failed to query available provider packages.*", PLUGIN_NETWORK_ERROR),
    (".*timeout while waiting for plugin to start.*", PLUGIN_NETWORK_ERROR),
    (".*timed out waiting for server handshake.*", PLUGIN_NETWORK_ERROR),
    ("could not query provider registry for", PLUGIN_NETWORK_ERROR),
    (
        ".*Provider produced inconsistent result after apply.*",
        "Provider eventual consistency error.",
    ),
];

/// A single retryable error: a compiled pattern and a human-readable reason.
#[derive(Debug, Clone)]
pub struct RetryableError {
    pub pattern: Regex,
    pub reason: String,
}

/// How terraform failures are retried.
///
/// Carried by every `TerraformOptions` value rather than held globally, so
/// two scenarios in the same process can use different policies.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retryable_errors: Vec<RetryableError>,
    pub max_retries: u32,
    pub time_between_retries: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            retryable_errors: Vec::new(),
            max_retries: 0,
            time_between_retries: Duration::ZERO,
        }
    }

    /// Build a policy from `(pattern, reason)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRetryPattern` if a pattern is not a valid regex.
    pub fn from_patterns<'a, I>(
        patterns: I,
        max_retries: u32,
        time_between_retries: Duration,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let retryable_errors = patterns
            .into_iter()
            .map(|(pattern, reason)| {
                Regex::new(pattern)
                    .map(|pattern| RetryableError {
                        pattern,
                        reason: reason.to_string(),
                    })
                    .map_err(|e| ConfigError::InvalidRetryPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            retryable_errors,
            max_retries,
            time_between_retries,
        })
    }

    /// The default retryable error set with default retry counts and pause.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in pattern does not compile.
    pub fn with_default_retryable_errors() -> Result<Self, ConfigError> {
        Self::from_patterns(
            DEFAULT_RETRYABLE_ERRORS.iter().copied(),
            DEFAULT_MAX_RETRIES,
            DEFAULT_TIME_BETWEEN_RETRIES,
        )
    }

    /// Return the reason of the first retryable error matching `output`.
    #[must_use]
    pub fn match_retryable(&self, output: &str) -> Option<&str> {
        self.retryable_errors
            .iter()
            .find(|e| e.pattern.is_match(output))
            .map(|e| e.reason.as_str())
    }

    /// Total attempts allowed, counting the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
