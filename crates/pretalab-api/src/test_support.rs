//! Router fixtures shared by the route tests

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretalab_config::Config;
use pretalab_core::{
    Body as RecordBody, Collection, DocumentStore, MemoryStore, Record, StoreError, StoreResult,
    Task, Transaction,
};
use pretalab_gemini::{GenerationError, GenerationResult, TextGenerator};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{create_router, AppState};

pub const ABSENT_ID: &str = "60c72b2f9f1b2c001f8e9a2b";

#[derive(Clone)]
pub enum StubGenerator {
    Reply(String),
    Fail(GenerationError),
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        match self {
            StubGenerator::Reply(text) => Ok(text.clone()),
            StubGenerator::Fail(err) => Err(err.clone()),
        }
    }
}

/// Every operation fails as if the database were unreachable
pub struct FailingStore;

struct FailingCollection;

#[async_trait]
impl<R: Record> Collection<R> for FailingCollection {
    async fn list(&self) -> StoreResult<Vec<R>> {
        Err(StoreError::unexpected("connection refused"))
    }

    async fn get(&self, _id: &str) -> StoreResult<R> {
        Err(StoreError::unexpected("connection refused"))
    }

    async fn create(&self, _body: RecordBody) -> StoreResult<R> {
        Err(StoreError::unexpected("connection refused"))
    }

    async fn update(&self, _id: &str, _patch: RecordBody) -> StoreResult<R> {
        Err(StoreError::unexpected("connection refused"))
    }

    async fn delete(&self, _id: &str) -> StoreResult<R> {
        Err(StoreError::unexpected("connection refused"))
    }

    async fn clear(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    fn tasks(&self) -> &dyn Collection<Task> {
        &FailingCollection
    }

    fn transactions(&self) -> &dyn Collection<Transaction> {
        &FailingCollection
    }
}

fn config(expose_errors: bool) -> Config {
    let mut config = Config::default();
    config.server.expose_errors = expose_errors;
    config
}

pub fn test_router() -> Router {
    router_with(StubGenerator::Reply(String::new()), false)
}

pub fn router_with(generator: StubGenerator, expose_errors: bool) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(generator),
        config(expose_errors),
    );
    create_router(state)
}

pub fn failing_router(expose_errors: bool) -> Router {
    let state = AppState::new(
        Arc::new(FailingStore),
        Arc::new(StubGenerator::Reply(String::new())),
        config(expose_errors),
    );
    create_router(state)
}

/// Send a request with an optional JSON body and decode the response
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let raw = body.map(|value| value.to_string()).unwrap_or_default();
    send_raw(router, method, uri, &raw).await
}

/// Send a raw body. The response decodes as JSON when possible, as a string
/// otherwise, and as `Null` when empty.
pub async fn send_raw(router: &Router, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
