use serde::{Deserialize, Serialize};

use crate::resource::{CATALOG, ResourceType};

/// Capability statement advertising the exposed resource types (simplified)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    pub resource_type: String,
    pub status: String,
    pub kind: String,
    pub fhir_version: String,
    pub format: Vec<String>,
    pub rest: Vec<CapabilityRest>,
}

impl CapabilityStatement {
    /// Create the capability statement for the given resource types
    pub fn for_types(types: &[ResourceType]) -> Self {
        Self {
            resource_type: "CapabilityStatement".to_string(),
            status: "active".to_string(),
            kind: "instance".to_string(),
            fhir_version: "0.0.82".to_string(), // DSTU1
            format: vec!["json".to_string()],
            rest: vec![CapabilityRest {
                mode: "server".to_string(),
                resource: types.iter().map(CapabilityResource::for_type).collect(),
            }],
        }
    }
}

impl Default for CapabilityStatement {
    fn default() -> Self {
        Self::for_types(CATALOG)
    }
}

/// REST capability declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRest {
    pub mode: String,
    pub resource: Vec<CapabilityResource>,
}

/// Resource capability declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub interaction: Vec<Interaction>,
}

impl CapabilityResource {
    fn for_type(resource_type: &ResourceType) -> Self {
        Self {
            resource_type: resource_type.name.to_string(),
            interaction: ["read", "update", "delete", "create", "search-type"]
                .into_iter()
                .map(|code| Interaction {
                    code: code.to_string(),
                })
                .collect(),
        }
    }
}

/// Interaction supported on a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub code: String,
}
