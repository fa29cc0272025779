//! Route modules for the API server
//!
//! - tasks: Task CRUD
//! - transactions: Transaction CRUD
//! - gemini: Text generation
//!
//! Tasks and transactions share the same response contract; the helpers here
//! implement it once over any [`Collection`], and each resource module supplies
//! its own messages.

pub mod gemini;
pub mod tasks;
pub mod transactions;

use axum::http::StatusCode;
use axum::Json;
use pretalab_core::{Body, Collection, Record, StoreError};

use crate::error::ApiError;
use crate::AppState;

/// User-facing messages for one resource
pub struct ResourceMessages {
    pub invalid_id: &'static str,
    pub not_found: &'static str,
    pub list_failed: &'static str,
    pub get_failed: &'static str,
    pub create_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl ResourceMessages {
    fn failed(&self, operation: Operation) -> &'static str {
        match operation {
            Operation::List => self.list_failed,
            Operation::Get => self.get_failed,
            Operation::Create => self.create_failed,
            Operation::Update => self.update_failed,
            Operation::Delete => self.delete_failed,
        }
    }
}

/// Map a store failure onto the response contract
pub fn store_error<R: Record>(
    state: &AppState,
    messages: &ResourceMessages,
    operation: Operation,
    err: StoreError,
) -> ApiError {
    err.log(&format!("{} {}", operation.as_str(), R::KIND));
    match err {
        StoreError::MalformedId { .. } => ApiError::bad_request(messages.invalid_id),
        StoreError::NotFound { .. } => ApiError::not_found(messages.not_found),
        StoreError::ValidationFailed { message, .. } => ApiError::bad_request(message),
        StoreError::Unexpected { detail } => {
            ApiError::internal(messages.failed(operation), detail, state.expose_errors())
        }
    }
}

pub async fn list<R: Record>(
    state: &AppState,
    collection: &dyn Collection<R>,
    messages: &ResourceMessages,
) -> Result<Json<Vec<R>>, ApiError> {
    collection
        .list()
        .await
        .map(Json)
        .map_err(|e| store_error::<R>(state, messages, Operation::List, e))
}

pub async fn get<R: Record>(
    state: &AppState,
    collection: &dyn Collection<R>,
    messages: &ResourceMessages,
    id: &str,
) -> Result<Json<R>, ApiError> {
    collection
        .get(id)
        .await
        .map(Json)
        .map_err(|e| store_error::<R>(state, messages, Operation::Get, e))
}

pub async fn create<R: Record>(
    state: &AppState,
    collection: &dyn Collection<R>,
    messages: &ResourceMessages,
    body: Body,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let record = collection
        .create(body)
        .await
        .map_err(|e| store_error::<R>(state, messages, Operation::Create, e))?;
    log::info!("Created {} {}", R::KIND, record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<R: Record>(
    state: &AppState,
    collection: &dyn Collection<R>,
    messages: &ResourceMessages,
    id: &str,
    patch: Body,
) -> Result<Json<R>, ApiError> {
    collection
        .update(id, patch)
        .await
        .map(Json)
        .map_err(|e| store_error::<R>(state, messages, Operation::Update, e))
}

pub async fn delete<R: Record>(
    state: &AppState,
    collection: &dyn Collection<R>,
    messages: &ResourceMessages,
    id: &str,
) -> Result<StatusCode, ApiError> {
    let record = collection
        .delete(id)
        .await
        .map_err(|e| store_error::<R>(state, messages, Operation::Delete, e))?;
    log::info!("Deleted {} {}", R::KIND, record.id());
    Ok(StatusCode::NO_CONTENT)
}
