//! Domain layer: pure types, validation, and parsing.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod options;
pub mod plan;
pub mod report;
pub mod retry;
pub mod stack;
pub mod unique_id;

pub use config::SuiteConfig;
pub use error::{ConfigError, ProcessError, TerraformError, VerificationError};
pub use options::{Subcommand, TerraformOptions};
pub use plan::PlanStruct;
pub use report::{RunReport, Scenario, ScenarioReport};
pub use retry::RetryPolicy;
pub use stack::StackNames;
pub use unique_id::unique_id;
