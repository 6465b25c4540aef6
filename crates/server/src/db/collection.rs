use std::marker::PhantomData;
use std::sync::Arc;

use fhir_docstore_core::{ObjectId, Resource, ResourceError, ResourceType};

use super::store::DocumentStore;

/// Typed view of one resource type's collection.
///
/// Identifiers arriving as strings are validated here, before the store is
/// touched.
pub struct Collection<R> {
    resource_type: ResourceType,
    store: Arc<dyn DocumentStore>,
    _schema: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            resource_type: self.resource_type,
            store: self.store.clone(),
            _schema: PhantomData,
        }
    }
}

impl<R: Resource> Collection<R> {
    pub fn new(resource_type: ResourceType, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            resource_type,
            store,
            _schema: PhantomData,
        }
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub async fn find_all(&self, limit: usize) -> Result<Vec<R>, ResourceError> {
        self.store
            .find_all(self.resource_type.collection, limit)
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<R, ResourceError> {
        let id = ObjectId::parse(id)?;
        let doc = self
            .store
            .find_by_id(self.resource_type.collection, &id)
            .await
            .map_err(|e| e.into_resource_error(self.resource_type.name, &id))?;
        R::from_document(doc)
    }

    /// Store a resource whose id has already been assigned.
    pub async fn insert(&self, resource: &R) -> Result<(), ResourceError> {
        let id = match resource.id() {
            Some(id) => ObjectId::parse(id)?,
            None => {
                return Err(ResourceError::StoreFailure(
                    "resource has no id assigned".to_string(),
                ));
            }
        };
        self.store
            .insert(self.resource_type.collection, &id, resource.to_document()?)
            .await
            .map_err(|e| e.into_resource_error(self.resource_type.name, &id))
    }

    pub async fn replace_by_id(&self, id: &str, resource: &R) -> Result<(), ResourceError> {
        let id = ObjectId::parse(id)?;
        self.store
            .replace_by_id(self.resource_type.collection, &id, resource.to_document()?)
            .await
            .map_err(|e| e.into_resource_error(self.resource_type.name, &id))
    }

    pub async fn remove_by_id(&self, id: &str) -> Result<(), ResourceError> {
        let id = ObjectId::parse(id)?;
        self.store
            .remove_by_id(self.resource_type.collection, &id)
            .await
            .map_err(|e| e.into_resource_error(self.resource_type.name, &id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use fhir_docstore_core::Document;
    use serde_json::json;

    const ENCOUNTER: ResourceType = ResourceType::new("Encounter", "encounters");

    fn collection() -> Collection<Document> {
        Collection::new(ENCOUNTER, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let encounters = collection();
        let mut doc: Document = serde_json::from_value(json!({"note": "visit"})).unwrap();
        let id = ObjectId::new();
        doc.set_id(id);

        encounters.insert(&doc).await.unwrap();
        let found = encounters.find_by_id(&id.to_hex()).await.unwrap();
        assert_eq!(found, doc);
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        let encounters = collection();
        assert!(matches!(
            encounters.find_by_id("nope").await,
            Err(ResourceError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            encounters.remove_by_id("nope").await,
            Err(ResourceError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn insert_requires_an_id() {
        let encounters = collection();
        let doc = Document::default();
        assert!(matches!(
            encounters.insert(&doc).await,
            Err(ResourceError::StoreFailure(_))
        ));
    }

    #[tokio::test]
    async fn missing_documents_report_not_found() {
        let encounters = collection();
        let id = ObjectId::new().to_hex();
        let err = encounters.find_by_id(&id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Encounter/{} not found", id));
    }
}
