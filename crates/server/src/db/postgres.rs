use async_trait::async_trait;
use deadpool_postgres::Pool;
use fhir_docstore_core::ObjectId;
use serde_json::Value as JsonValue;
use tokio_postgres::error::SqlState;

use super::store::{DocumentStore, StoreError};

/// Schema for the document table. Every collection shares one table; `seq`
/// gives the store-native order used by `find_all`.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT        NOT NULL,
    id          TEXT        NOT NULL,
    seq         BIGSERIAL,
    body        JSONB       NOT NULL,
    inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (collection, id)
);
CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq);
";

/// Document store backed by a PostgreSQL JSONB table
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the document table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn find_all(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let client = self.pool.get().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = client
            .query(
                "SELECT body FROM documents WHERE collection = $1 ORDER BY seq LIMIT $2",
                &[&collection, &limit],
            )
            .await?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> Result<JsonValue, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT body FROM documents WHERE collection = $1 AND id = $2",
                &[&collection, &id.to_hex()],
            )
            .await?;

        match row {
            Some(row) => Ok(row.get(0)),
            None => Err(StoreError::NotFound),
        }
    }

    async fn insert(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        let result = client
            .execute(
                "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)",
                &[&collection, &id.to_hex(), &document],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StoreError::Conflict(id.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: JsonValue,
    ) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2",
                &[&collection, &id.to_hex(), &document],
            )
            .await?;

        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(
                "DELETE FROM documents WHERE collection = $1 AND id = $2",
                &[&collection, &id.to_hex()],
            )
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}
