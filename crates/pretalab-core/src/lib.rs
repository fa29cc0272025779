//! Records, schema validation and document stores
//!
//! Tasks and transactions are loose JSON bodies on the way in. [`models`] turns them
//! into validated records, and a [`DocumentStore`] keeps one collection of each.

pub mod error;
pub mod id;
pub mod models;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{ErrorCode, ErrorSeverity, FieldError, StoreError, StoreResult, ValidationErrors};
pub use id::RecordId;
pub use models::{Record, Task, Transaction};
pub use schema::Body;
pub use store::{connect, Collection, DocumentStore, MemoryStore, StoreRef};
#[cfg(feature = "mongodb")]
pub use store::MongoStore;
pub use types::{RecordKind, TransactionType};
