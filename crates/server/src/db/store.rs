//! Document store abstraction

use async_trait::async_trait;
use fhir_docstore_core::{ObjectId, ResourceError};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors raised by a [`DocumentStore`] backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("duplicate id {0}")]
    Conflict(String),

    #[error("{0}")]
    Backend(String),
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Backend(format!("Database pool error: {}", err))
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        StoreError::Backend(format!("Database error: {}", err))
    }
}

impl StoreError {
    /// Attach the resource type and id the failed operation was about.
    pub fn into_resource_error(self, resource_type: &str, id: &ObjectId) -> ResourceError {
        match self {
            StoreError::NotFound => ResourceError::not_found(resource_type, id.to_hex()),
            other => ResourceError::StoreFailure(other.to_string()),
        }
    }
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        ResourceError::StoreFailure(err.to_string())
    }
}

/// Named collections of JSON documents keyed by [`ObjectId`].
///
/// Implementations are shared by every request and must be safe for
/// concurrent use without outside locking.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Up to `limit` documents of `collection` in store-native order.
    async fn find_all(&self, collection: &str, limit: usize)
    -> Result<Vec<JsonValue>, StoreError>;

    /// Returns `StoreError::NotFound` when no document has this id.
    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<JsonValue, StoreError>;

    /// Returns `StoreError::Conflict` when the id is already taken.
    async fn insert(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError>;

    /// Full replace. Returns `StoreError::NotFound` when no document matched.
    async fn replace_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError>;

    /// Returns `StoreError::NotFound` when no document matched.
    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> Result<(), StoreError>;

    /// Cheap connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
