//! JSON output helpers.

use anyhow::{Context, Result};

use crate::domain::RunReport;

/// Pretty JSON for a run report.
///
/// Output:
/// ```json
/// {
///   "passed": false,
///   "scenarios": [
///     { "scenario": "validate", "passed": true, "started_at": "...", "duration_ms": 812 }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &RunReport) -> Result<String> {
    let obj = serde_json::json!({
        "passed": report.passed(),
        "scenarios": report.scenarios,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a JSON error object for failures that happen before any scenario runs.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
