//! Structured view of `terraform show -json <plan>` output.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::error::{TerraformError, VerificationError};

/// A resource as it will exist once the plan is applied.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannedResource {
    pub address: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: serde_json::Value,
}

/// The change terraform would make to one resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    pub change: ChangeActions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeActions {
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    format_version: String,
    #[serde(default)]
    planned_values: Option<RawValues>,
    #[serde(default)]
    resource_changes: Vec<ResourceChange>,
}

#[derive(Debug, Deserialize)]
struct RawValues {
    root_module: Option<RawModule>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModule {
    #[serde(default)]
    resources: Vec<PlannedResource>,
    #[serde(default)]
    child_modules: Vec<RawModule>,
}

/// Parsed plan, keyed by resource address.
#[derive(Debug, Clone)]
pub struct PlanStruct {
    pub raw_json: String,
    pub format_version: String,
    pub planned_values: BTreeMap<String, PlannedResource>,
    pub resource_changes: BTreeMap<String, ResourceChange>,
}

impl PlanStruct {
    /// Parse the JSON document printed by `terraform show -json`.
    ///
    /// Resources from nested child modules are flattened into the same map
    /// under their full address (`module.x.azurerm_y.z`).
    ///
    /// # Errors
    ///
    /// Returns `TerraformError::InvalidPlan` if the document is not a plan.
    pub fn parse(json: &str) -> Result<Self, TerraformError> {
        let raw: RawPlan =
            serde_json::from_str(json).map_err(|e| TerraformError::InvalidPlan(e.to_string()))?;

        let mut planned_values = BTreeMap::new();
        if let Some(root) = raw.planned_values.and_then(|v| v.root_module) {
            collect(root, &mut planned_values);
        }

        let resource_changes = raw
            .resource_changes
            .into_iter()
            .map(|c| (c.address.clone(), c))
            .collect();

        Ok(Self {
            raw_json: json.to_string(),
            format_version: raw.format_version,
            planned_values,
            resource_changes,
        })
    }

    /// Look up a planned resource, failing if the address is absent.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::PlannedResourceMissing` listing the
    /// addresses that are planned.
    pub fn require_planned_value(&self, address: &str) -> Result<&PlannedResource, VerificationError> {
        self.planned_values
            .get(address)
            .ok_or_else(|| VerificationError::PlannedResourceMissing {
                address: address.to_string(),
                available: self.planned_addresses().join(", "),
            })
    }

    /// Actions planned for `address` (e.g. `["create"]`), if it changes.
    #[must_use]
    pub fn change_actions(&self, address: &str) -> Option<&[String]> {
        self.resource_changes
            .get(address)
            .map(|c| c.change.actions.as_slice())
    }

    #[must_use]
    pub fn planned_addresses(&self) -> Vec<&str> {
        self.planned_values.keys().map(String::as_str).collect()
    }
}

fn collect(module: RawModule, out: &mut BTreeMap<String, PlannedResource>) {
    for resource in module.resources {
        out.insert(resource.address.clone(), resource);
    }
    for child in module.child_modules {
        collect(child, out);
    }
}
