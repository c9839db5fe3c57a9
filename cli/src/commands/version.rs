//! Version command: tfcheck's own version and the terraform it would drive.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::infra::config::YamlConfigLoader;
use crate::infra::terraform::TerraformCli;

/// Run the version command.
///
/// The terraform binary comes from config when it loads, otherwise the
/// default. A missing terraform is reported, not an error.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub async fn run(json: bool, config: Option<PathBuf>) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let config = YamlConfigLoader::new(config).load().unwrap_or_default();
    let binary = &config.terraform.binary;

    let tf = TerraformCli::default_runner(config.command_timeout(), config.apply_timeout());
    let terraform = match tf.version(binary).await {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(%binary, error = %format!("{e:#}"), "terraform version unavailable");
            None
        }
    };

    if json {
        let obj = serde_json::json!({
            "version": version,
            "terraform": terraform,
        });
        println!(
            "{}",
            serde_json::to_string(&obj).context("JSON serialization failed")?
        );
    } else {
        println!("tfcheck {version}");
        match terraform {
            Some(v) => println!("terraform {v}"),
            None => println!("terraform not found ({binary})"),
        }
    }
    Ok(())
}
