use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use fhir_docstore_core::ObjectId;
use serde_json::Value as JsonValue;

use super::store::{DocumentStore, StoreError};

/// In-process document store.
///
/// Collections keep insertion order, which is what `find_all` returns.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(ObjectId, JsonValue)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().take(limit).map(|(_, d)| d.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<JsonValue, StoreError> {
        let collections = self.collections.read().map_err(poisoned)?;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(k, _)| k == id))
            .map(|(_, d)| d.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn insert(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|(k, _)| k == id) {
            return Err(StoreError::Conflict(id.to_hex()));
        }
        docs.push((*id, document));
        Ok(())
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(k, _)| k == id))
            .ok_or(StoreError::NotFound)?;
        slot.1 = document;
        Ok(())
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let docs = collections
            .get_mut(collection)
            .ok_or(StoreError::NotFound)?;
        let pos = docs
            .iter()
            .position(|(k, _)| k == id)
            .ok_or(StoreError::NotFound)?;
        docs.remove(pos);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.collections.read().map_err(poisoned)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn find_all_respects_limit_and_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert("alerts", &ObjectId::new(), json!({ "n": i }))
                .await
                .unwrap();
        }

        let docs = store.find_all("alerts", 3).await.unwrap();
        assert_eq!(docs, vec![json!({"n": 0}), json!({"n": 1}), json!({"n": 2})]);
        assert!(store.find_all("slots", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert("alerts", &id, json!({})).await.unwrap();

        assert!(matches!(
            store.find_by_id("slots", &id).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.len("alerts"), 1);
        assert!(store.is_empty("slots"));
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert("alerts", &id, json!({})).await.unwrap();
        assert!(matches!(
            store.insert("alerts", &id, json!({})).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn replace_and_remove_require_a_match() {
        let store = MemoryStore::new();
        let id = ObjectId::new();

        assert!(matches!(
            store.replace_by_id("alerts", &id, json!({})).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.remove_by_id("alerts", &id).await,
            Err(StoreError::NotFound)
        ));

        store.insert("alerts", &id, json!({"a": 1})).await.unwrap();
        store.replace_by_id("alerts", &id, json!({"b": 2})).await.unwrap();
        assert_eq!(store.find_by_id("alerts", &id).await.unwrap(), json!({"b": 2}));

        store.remove_by_id("alerts", &id).await.unwrap();
        assert!(matches!(
            store.remove_by_id("alerts", &id).await,
            Err(StoreError::NotFound)
        ));
    }
}
