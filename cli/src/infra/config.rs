//! Loading `SuiteConfig` from YAML on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::SuiteConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TFCHECK_CONFIG";

/// Config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "tfcheck.yaml";

/// Reads configuration from YAML, falling back to defaults.
pub struct YamlConfigLoader {
    explicit: Option<PathBuf>,
}

impl YamlConfigLoader {
    /// `explicit` (from `--config`) wins over every other source.
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Resolve which file to read, if any.
    ///
    /// Order: `--config`, `TFCHECK_CONFIG`, `./tfcheck.yaml`,
    /// `<user config dir>/tfcheck/config.yaml`. Explicit paths must exist;
    /// implicit ones are skipped when missing.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        if let Some(p) = &self.explicit {
            return Some(p.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            if !val.trim().is_empty() {
                return Some(PathBuf::from(val));
            }
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|d| d.join("tfcheck").join("config.yaml"))
            .filter(|p| p.is_file())
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected file cannot be read or parsed, or if a
    /// value fails validation.
    pub fn load(&self) -> Result<SuiteConfig> {
        let config = match self.path() {
            Some(path) => read(&path)?,
            None => SuiteConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn read(path: &Path) -> Result<SuiteConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(SuiteConfig::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
