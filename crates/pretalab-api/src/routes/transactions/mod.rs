//! Transaction routes - CRUD over the `transactions` collection
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{
    create_transaction, delete_transaction, get_transaction, list_transactions,
    update_transaction,
};
