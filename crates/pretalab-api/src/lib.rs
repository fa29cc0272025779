//! HTTP API server
//!
//! Routes are organized into modules:
//! - routes::tasks: Task CRUD
//! - routes::transactions: Transaction CRUD
//! - routes::gemini: Text generation

pub mod error;
pub mod extract;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pretalab_config::Config;
use pretalab_core::StoreRef;
use pretalab_gemini::GeneratorRef;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

pub const WELCOME: &str = "Bem-vindo à API de Tarefas, Transações (MongoDB) e Gemini!";
pub const ROUTE_NOT_FOUND: &str = "Rota não encontrada.";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreRef,
    pub generator: GeneratorRef,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: StoreRef, generator: GeneratorRef, config: Config) -> Self {
        Self {
            store,
            generator,
            config: Arc::new(config),
        }
    }

    /// Whether 500 responses carry the underlying error text
    pub fn expose_errors(&self) -> bool {
        self.config.server.expose_errors
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::gemini::generate_text;
    use routes::tasks::{create_task, delete_task, get_task, list_tasks, update_task};
    use routes::transactions::{
        create_transaction, delete_transaction, get_transaction, list_transactions,
        update_transaction,
    };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/gemini/generate", post(generate_text))
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    WELCOME
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": ROUTE_NOT_FOUND })))
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let backend = state.store.backend();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting pretalab server on http://{} ({} store)", addr, backend);
    log::info!("Available routes:");
    log::info!("  - /tasks, /tasks/:id");
    log::info!("  - /transactions, /transactions/:id");
    log::info!("  - /gemini/generate");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
