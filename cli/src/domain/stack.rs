//! Names, variables, and expectations for the Azure stack under test.

use std::collections::BTreeMap;

use crate::domain::error::{ConfigError, VerificationError};

pub const DEFAULT_NAME_PREFIX: &str = "casino-test";
pub const DEFAULT_LOCATION: &str = "East US";

/// Terraform outputs read after apply.
pub const OUTPUT_RESOURCE_GROUP: &str = "resource_group_name";
pub const OUTPUT_ACR_LOGIN_SERVER: &str = "acr_login_server";
pub const OUTPUT_AKS_CLUSTER: &str = "aks_cluster_name";

/// Resource addresses a plan of the stack must contain.
pub const EXPECTED_PLAN_ADDRESSES: &[&str] = &[
    "azurerm_resource_group.main",
    "azurerm_container_registry.main",
    "azurerm_kubernetes_cluster.main",
    "azurerm_log_analytics_workspace.main",
];

/// Resource names for one run, namespaced by a unique suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackNames {
    pub resource_group: String,
    pub container_registry: String,
    pub cluster: String,
}

impl StackNames {
    /// Build names as `<prefix>-rg-<id>`, `<prefix without dashes>acr<id>`,
    /// `<prefix>-aks-<id>`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRegistryName` if the registry name would be
    /// rejected by Azure.
    pub fn new(prefix: &str, unique_id: &str) -> Result<Self, ConfigError> {
        let compact: String = prefix.chars().filter(|c| *c != '-').collect();
        let container_registry = format!("{compact}acr{unique_id}");
        validate_registry_name(&container_registry)?;
        Ok(Self {
            resource_group: format!("{prefix}-rg-{unique_id}"),
            container_registry,
            cluster: format!("{prefix}-aks-{unique_id}"),
        })
    }

    /// Terraform input variables for this stack.
    #[must_use]
    pub fn vars(&self, location: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("resource_group_name".to_string(), self.resource_group.clone()),
            ("location".to_string(), location.to_string()),
            ("acr_name".to_string(), self.container_registry.clone()),
            ("aks_cluster_name".to_string(), self.cluster.clone()),
        ])
    }
}

/// Azure container registry names: 5-50 ASCII alphanumerics.
///
/// # Errors
///
/// Returns `ConfigError::InvalidRegistryName` for any other name.
pub fn validate_registry_name(name: &str) -> Result<(), ConfigError> {
    let valid = (5..=50).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(ConfigError::InvalidRegistryName(name.to_string()));
    }
    Ok(())
}

/// Registry name from its login server (`myacr.azurecr.io` → `myacr`).
///
/// # Errors
///
/// Returns `VerificationError::InvalidLoginServer` if the first DNS label is empty.
pub fn registry_name_from_login_server(login_server: &str) -> Result<String, VerificationError> {
    let label = login_server
        .trim()
        .split('.')
        .next()
        .unwrap_or_default();
    if label.is_empty() {
        return Err(VerificationError::InvalidLoginServer(login_server.to_string()));
    }
    Ok(label.to_string())
}
