//! Scenario identifiers and run reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The three lifecycle scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// init + apply, verify outputs and resources, destroy.
    Provision,
    /// init + validate.
    Validate,
    /// init + plan + show, verify planned resources.
    Plan,
}

impl Scenario {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Validate => "validate",
            Self::Plan => "plan",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Build a report from a scenario result, flattening the error chain.
    #[must_use]
    pub fn from_result<T>(
        scenario: Scenario,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        result: &anyhow::Result<T>,
    ) -> Self {
        let duration_ms = u64::try_from((finished_at - started_at).num_milliseconds()).unwrap_or(0);
        Self {
            scenario,
            passed: result.is_ok(),
            error: result.as_ref().err().map(|e| format!("{e:#}")),
            started_at,
            duration_ms,
        }
    }
}

/// Results of every scenario in one invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    /// A run passes only if every scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.passed).count()
    }
}
