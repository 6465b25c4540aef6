use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::resource::{Resource, ResourceType};

/// Maximum number of entries an index bundle carries.
pub const INDEX_PAGE_SIZE: usize = 100;

/// Scheme used in bundle categories to identify the resource type.
pub const RESOURCE_TYPE_SCHEME: &str = "http://hl7.org/fhir/resource-types";

/// Category triple identifying the resource type of a bundle or entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub term: String,
    pub label: String,
    pub scheme: String,
}

impl Category {
    pub fn for_type(resource_type: &ResourceType) -> Self {
        Self {
            term: resource_type.name.to_string(),
            label: resource_type.name.to_string(),
            scheme: RESOURCE_TYPE_SCHEME.to_string(),
        }
    }
}

/// Search result envelope for one resource type.
///
/// `total_results` counts the entries in this bundle, not every matching
/// document in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<R> {
    pub resource_type: String,
    pub title: String,
    pub id: String,
    pub updated: DateTime<Utc>,
    pub total_results: usize,
    #[serde(default)]
    pub entry: Vec<BundleEntry<R>>,
    pub category: Category,
}

/// A single resource wrapped for inclusion in a [`Bundle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEntry<R> {
    pub title: String,
    pub id: String,
    pub content: R,
    pub category: Category,
}

impl<R: Resource> Bundle<R> {
    /// Wrap `resources` into a fresh bundle.
    pub fn build(resource_type: &ResourceType, resources: Vec<R>) -> Self {
        let category = Category::for_type(resource_type);

        let entry: Vec<BundleEntry<R>> = resources
            .into_iter()
            .map(|content| {
                let id = content.id().unwrap_or_default().to_string();
                BundleEntry {
                    title: format!("{} {}", resource_type.name, id),
                    id,
                    content,
                    category: category.clone(),
                }
            })
            .collect();

        Self {
            resource_type: "Bundle".to_string(),
            title: format!("{} Index", resource_type.name),
            id: ObjectId::new().to_hex(),
            updated: Utc::now(),
            total_results: entry.len(),
            entry,
            category,
        }
    }
}
