//! Document store abstraction
//!
//! A store holds two independent collections, one per [`Record`] type. Every
//! operation takes the raw identifier token from the request path and decides
//! itself whether it is well-formed, so callers see `MalformedId` before any
//! lookup and `NotFound` only for well-formed ids.

pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

use async_trait::async_trait;
use pretalab_config::{DatabaseConfig, StoreBackend};
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::id::RecordId;
use crate::models::{Record, Task, Transaction};
use crate::schema::Body;

pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

/// Shared store handle
pub type StoreRef = Arc<dyn DocumentStore>;

/// One collection of schema-validated records
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// All records, in store-native order
    async fn list(&self) -> StoreResult<Vec<R>>;

    async fn get(&self, id: &str) -> StoreResult<R>;

    /// Validate and insert a new record
    async fn create(&self, body: Body) -> StoreResult<R>;

    /// Merge `patch` into the stored record, re-validate, and persist
    async fn update(&self, id: &str, patch: Body) -> StoreResult<R>;

    /// Remove a record, returning what was deleted
    async fn delete(&self, id: &str) -> StoreResult<R>;

    /// Remove every record
    async fn clear(&self) -> StoreResult<()>;
}

/// The task and transaction collections behind one backend
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    fn tasks(&self) -> &dyn Collection<Task>;

    fn transactions(&self) -> &dyn Collection<Transaction>;

    /// Empty both collections
    async fn clear(&self) -> StoreResult<()> {
        self.tasks().clear().await?;
        self.transactions().clear().await
    }
}

/// Parse an identifier token or report it as malformed
pub fn parse_id(token: &str) -> StoreResult<RecordId> {
    RecordId::parse(token).ok_or_else(|| StoreError::malformed_id(token))
}

/// Open the backend selected by the connection string
pub async fn connect(config: &DatabaseConfig) -> StoreResult<StoreRef> {
    match config.backend() {
        Some(StoreBackend::Memory) => {
            log::info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Some(StoreBackend::MongoDb) => connect_mongo(config).await,
        None => Err(StoreError::unexpected(format!(
            "unsupported database URI scheme: {}",
            pretalab_config::redact_uri(&config.uri)
        ))),
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongo(config: &DatabaseConfig) -> StoreResult<StoreRef> {
    let store = MongoStore::connect(&config.uri, &config.name).await?;
    log::info!("Connected to MongoDB database '{}'", config.name);
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongo(_config: &DatabaseConfig) -> StoreResult<StoreRef> {
    Err(StoreError::unexpected(
        "MongoDB support is not compiled in; rebuild with the `mongodb` feature",
    ))
}
