//! Task routes - CRUD over the `tasks` collection
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{create_task, delete_task, get_task, list_tasks, update_task};
