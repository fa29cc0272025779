//! In-process document store
//!
//! Records live in insertion order behind one `RwLock` per collection. Each
//! write holds the collection lock only for the duration of the single
//! document change.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{parse_id, Collection, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{self, Record, Task, Transaction};
use crate::schema::Body;

/// One in-memory collection
pub struct MemoryCollection<R> {
    docs: RwLock<Vec<R>>,
}

impl<R> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn list(&self) -> StoreResult<Vec<R>> {
        Ok(self.docs.read().await.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<R> {
        let id = parse_id(id)?;
        self.docs
            .read()
            .await
            .iter()
            .find(|doc| doc.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn create(&self, body: Body) -> StoreResult<R> {
        let record = R::from_body(&body, models::now())
            .map_err(|errors| StoreError::invalid_create(R::KIND, errors))?;
        self.docs.write().await.push(record.clone());
        log::debug!("Inserted {} {}", R::KIND, record.id());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: Body) -> StoreResult<R> {
        let id = parse_id(id)?;
        let mut docs = self.docs.write().await;
        let slot = docs
            .iter_mut()
            .find(|doc| doc.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let updated = slot
            .merged(&patch, models::now())
            .map_err(StoreError::invalid_update)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<R> {
        let id = parse_id(id)?;
        let mut docs = self.docs.write().await;
        let index = docs
            .iter()
            .position(|doc| doc.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        Ok(docs.remove(index))
    }

    async fn clear(&self) -> StoreResult<()> {
        self.docs.write().await.clear();
        Ok(())
    }
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    tasks: MemoryCollection<Task>,
    transactions: MemoryCollection<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn tasks(&self) -> &dyn Collection<Task> {
        &self.tasks
    }

    fn transactions(&self) -> &dyn Collection<Transaction> {
        &self.transactions
    }
}
