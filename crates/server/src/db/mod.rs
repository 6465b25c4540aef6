mod collection;
mod memory;
mod postgres;
mod store;

pub use collection::Collection;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{DocumentStore, StoreError};

use std::sync::Arc;

use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

use crate::config::{Config as AppConfig, StoreBackend};

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Errors raised while setting up the configured store
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to create database pool: {0}")]
    Pool(#[from] deadpool_postgres::CreatePoolError),

    #[error("failed to prepare document table: {0}")]
    Migrate(#[from] StoreError),
}

/// Build the store selected by the configuration.
///
/// The returned handle is shared by every request.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, SetupError> {
    match config.store_backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            let store = PostgresStore::new(pool);
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
