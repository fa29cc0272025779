//! MongoDB document store
//!
//! Records are stored with native BSON types: `_id` as an ObjectId and the
//! timestamps as BSON dates. Validation happens here before every write, the same
//! way the in-memory store does it.

use async_trait::async_trait;
use bson::document::ValueAccessError;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::Client;
use std::marker::PhantomData;

use super::{parse_id, Collection, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{self, Record, Task, Transaction};
use crate::schema::Body;
use crate::types::{RecordKind, TransactionType};

/// Conversion between a record and its BSON document
pub trait BsonRecord: Record {
    fn to_document(&self) -> Document;

    fn from_document(doc: &Document) -> StoreResult<Self>;
}

fn malformed(kind: RecordKind, reason: impl std::fmt::Display) -> StoreError {
    StoreError::unexpected(format!("malformed {} document: {}", kind, reason))
}

impl BsonRecord for Task {
    fn to_document(&self) -> Document {
        doc! {
            "_id": self.id.object_id(),
            "title": self.title.as_str(),
            "completed": self.completed,
            "createdAt": bson::DateTime::from_chrono(self.created_at),
            "updatedAt": bson::DateTime::from_chrono(self.updated_at),
        }
    }

    fn from_document(doc: &Document) -> StoreResult<Self> {
        let bad = |e: ValueAccessError| malformed(RecordKind::Task, e);
        Ok(Task {
            id: doc.get_object_id("_id").map_err(bad)?.into(),
            title: doc.get_str("title").map_err(bad)?.to_string(),
            completed: doc.get_bool("completed").unwrap_or(false),
            created_at: doc.get_datetime("createdAt").map_err(bad)?.to_chrono(),
            updated_at: doc.get_datetime("updatedAt").map_err(bad)?.to_chrono(),
        })
    }
}

impl BsonRecord for Transaction {
    fn to_document(&self) -> Document {
        doc! {
            "_id": self.id.object_id(),
            "description": self.description.as_str(),
            "amount": self.amount,
            "date": bson::DateTime::from_chrono(self.date),
            "type": self.kind.as_str(),
            "category": self.category.as_str(),
            "createdAt": bson::DateTime::from_chrono(self.created_at),
            "updatedAt": bson::DateTime::from_chrono(self.updated_at),
        }
    }

    fn from_document(doc: &Document) -> StoreResult<Self> {
        let bad = |e: ValueAccessError| malformed(RecordKind::Transaction, e);
        // Other clients may have written integral amounts.
        let amount = match doc.get("amount") {
            Some(Bson::Double(v)) => *v,
            Some(Bson::Int32(v)) => f64::from(*v),
            Some(Bson::Int64(v)) => *v as f64,
            _ => return Err(malformed(RecordKind::Transaction, "amount is not a number")),
        };
        let kind: TransactionType = doc
            .get_str("type")
            .map_err(bad)?
            .parse()
            .map_err(|e: String| malformed(RecordKind::Transaction, e))?;

        Ok(Transaction {
            id: doc.get_object_id("_id").map_err(bad)?.into(),
            description: doc.get_str("description").map_err(bad)?.to_string(),
            amount,
            date: doc.get_datetime("date").map_err(bad)?.to_chrono(),
            kind,
            category: doc.get_str("category").map_err(bad)?.to_string(),
            created_at: doc.get_datetime("createdAt").map_err(bad)?.to_chrono(),
            updated_at: doc.get_datetime("updatedAt").map_err(bad)?.to_chrono(),
        })
    }
}

/// The `$set` body for an update: the validated values of the patched fields plus
/// the refreshed `updatedAt`. Fields the patch did not name are left to whatever
/// the stored document holds at write time.
pub fn set_document<R: BsonRecord>(updated: &R, patch: &Body) -> Document {
    let mut full = updated.to_document();
    let mut set = Document::new();
    for key in patch.keys() {
        if matches!(key.as_str(), "_id" | "createdAt" | "updatedAt") {
            continue;
        }
        if let Some(value) = full.remove(key) {
            set.insert(key.clone(), value);
        }
    }
    if let Some(updated_at) = full.remove("updatedAt") {
        set.insert("updatedAt", updated_at);
    }
    doc! { "$set": set }
}

/// One MongoDB collection of records
pub struct MongoCollection<R> {
    inner: mongodb::Collection<Document>,
    _record: PhantomData<fn() -> R>,
}

impl<R: BsonRecord> MongoCollection<R> {
    fn new(db: &mongodb::Database) -> Self {
        Self {
            inner: db.collection::<Document>(R::KIND.collection()),
            _record: PhantomData,
        }
    }

    async fn find(&self, id: &str) -> StoreResult<(bson::oid::ObjectId, R)> {
        let oid = parse_id(id)?.object_id();
        let found = self
            .inner
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(StoreError::unexpected)?;
        match found {
            Some(doc) => Ok((oid, R::from_document(&doc)?)),
            None => Err(StoreError::not_found(oid.to_hex())),
        }
    }
}

#[async_trait]
impl<R: BsonRecord> Collection<R> for MongoCollection<R> {
    async fn list(&self) -> StoreResult<Vec<R>> {
        let cursor = self
            .inner
            .find(None, None)
            .await
            .map_err(StoreError::unexpected)?;
        let docs: Vec<Document> = cursor.try_collect().await.map_err(StoreError::unexpected)?;
        docs.iter().map(R::from_document).collect()
    }

    async fn get(&self, id: &str) -> StoreResult<R> {
        self.find(id).await.map(|(_, record)| record)
    }

    async fn create(&self, body: Body) -> StoreResult<R> {
        let record = R::from_body(&body, models::now())
            .map_err(|errors| StoreError::invalid_create(R::KIND, errors))?;
        self.inner
            .insert_one(record.to_document(), None)
            .await
            .map_err(StoreError::unexpected)?;
        Ok(record)
    }

    async fn update(&self, id: &str, patch: Body) -> StoreResult<R> {
        let (oid, existing) = self.find(id).await?;
        let updated = existing
            .merged(&patch, models::now())
            .map_err(StoreError::invalid_update)?;

        // Only the patched fields are written, so concurrent updates of other
        // fields on the same document are not overwritten.
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let written = self
            .inner
            .find_one_and_update(doc! { "_id": oid }, set_document(&updated, &patch), options)
            .await
            .map_err(StoreError::unexpected)?;
        match written {
            Some(doc) => R::from_document(&doc),
            // Deleted between the read and the write.
            None => Err(StoreError::not_found(oid.to_hex())),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<R> {
        let oid = parse_id(id)?.object_id();
        let deleted = self
            .inner
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await
            .map_err(StoreError::unexpected)?;
        match deleted {
            Some(doc) => R::from_document(&doc),
            None => Err(StoreError::not_found(oid.to_hex())),
        }
    }

    async fn clear(&self) -> StoreResult<()> {
        self.inner
            .delete_many(doc! {}, None)
            .await
            .map_err(StoreError::unexpected)?;
        Ok(())
    }
}

/// Store backed by a MongoDB database
pub struct MongoStore {
    tasks: MongoCollection<Task>,
    transactions: MongoCollection<Transaction>,
}

impl MongoStore {
    /// Connect and verify the server answers a ping
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(StoreError::unexpected)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(StoreError::unexpected)?;

        Ok(Self {
            tasks: MongoCollection::new(&db),
            transactions: MongoCollection::new(&db),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    fn tasks(&self) -> &dyn Collection<Task> {
        &self.tasks
    }

    fn transactions(&self) -> &dyn Collection<Transaction> {
        &self.transactions
    }
}
