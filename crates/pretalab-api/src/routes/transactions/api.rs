//! Transactions API endpoints
//!
//! Endpoints:
//! - list_transactions: GET /transactions
//! - get_transaction: GET /transactions/:id
//! - create_transaction: POST /transactions
//! - update_transaction: PUT /transactions/:id
//! - delete_transaction: DELETE /transactions/:id

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pretalab_core::Transaction;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::routes::{self, ResourceMessages};
use crate::AppState;

pub const MESSAGES: ResourceMessages = ResourceMessages {
    invalid_id: "ID de transação inválido.",
    not_found: "Transação não encontrada",
    list_failed: "Erro interno ao buscar transações.",
    get_failed: "Erro interno ao buscar transação.",
    create_failed: "Erro interno ao criar transação.",
    update_failed: "Erro interno ao atualizar transação.",
    delete_failed: "Erro interno ao deletar transação.",
};

pub async fn list_transactions(
    state: State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    routes::list(&state, state.store.transactions(), &MESSAGES).await
}

pub async fn get_transaction(
    state: State<AppState>,
    path: Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    routes::get(&state, state.store.transactions(), &MESSAGES, &path).await
}

pub async fn create_transaction(
    state: State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    routes::create(&state, state.store.transactions(), &MESSAGES, body).await
}

/// Merge the supplied fields into the transaction; the merged result must still validate
pub async fn update_transaction(
    state: State<AppState>,
    path: Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<Transaction>, ApiError> {
    routes::update(&state, state.store.transactions(), &MESSAGES, &path, patch).await
}

pub async fn delete_transaction(
    state: State<AppState>,
    path: Path<String>,
) -> Result<StatusCode, ApiError> {
    routes::delete(&state, state.store.transactions(), &MESSAGES, &path).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{failing_router, send, test_router, ABSENT_ID};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn rent() -> Value {
        json!({
            "description": "Aluguel",
            "amount": -1200,
            "date": "2024-07-05",
            "type": "expense",
            "category": "Moradia",
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let router = test_router();
        let (status, created) = send(&router, "POST", "/transactions", Some(rent())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["description"], "Aluguel");
        assert_eq!(created["amount"], json!(-1200.0));
        assert_eq!(created["type"], "expense");
        assert_eq!(created["date"], "2024-07-05T00:00:00.000Z");

        let uri = format!("/transactions/{}", created["_id"].as_str().unwrap());
        let (status, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_lists_every_missing_field() {
        let router = test_router();
        let (status, body) =
            send(&router, "POST", "/transactions", Some(json!({ "amount": -50 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Transaction validation failed: "));
        for field in ["description:", "date:", "type:", "category:"] {
            assert!(message.contains(field), "missing {} in {}", field, message);
        }
        assert!(!message.contains("amount:"));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_type() {
        let router = test_router();
        let mut body = rent();
        body["type"] = json!("gift");
        let (status, body) = send(&router, "POST", "/transactions", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("`gift` não é um tipo de transação válido"));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/transactions", Some(rent())).await;
        let uri = format!("/transactions/{}", created["_id"].as_str().unwrap());

        let (status, updated) = send(
            &router,
            "PUT",
            &uri,
            Some(json!({ "description": "Aluguel julho", "amount": "-1250.50" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["description"], "Aluguel julho");
        assert_eq!(updated["amount"], json!(-1250.5));
        assert_eq!(updated["category"], created["category"]);
        assert_eq!(updated["date"], created["date"]);

        let (_, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_merge() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/transactions", Some(rent())).await;
        let uri = format!("/transactions/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&router, "PUT", &uri, Some(json!({ "amount": "abc" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Validation failed: amount: O valor da transação deve ser numérico."
        );

        let (_, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_id_errors() {
        let router = test_router();
        for method in ["GET", "DELETE"] {
            let (status, body) = send(&router, method, "/transactions/123", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "message": "ID de transação inválido." }));

            let uri = format!("/transactions/{}", ABSENT_ID);
            let (status, body) = send(&router, method, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({ "message": "Transação não encontrada" }));
        }
        let (status, _) = send(&router, "PUT", "/transactions/123", Some(rent())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let router = test_router();
        let (status, body) =
            crate::test_support::send_raw(&router, "POST", "/transactions", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Corpo da requisição inválido.");
    }

    #[tokio::test]
    async fn test_store_failure_hides_detail_by_default() {
        let router = failing_router(false);
        let (status, body) = send(&router, "GET", "/transactions", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Erro interno ao buscar transações." }));
    }

    #[tokio::test]
    async fn test_store_failure_exposes_detail_when_enabled() {
        let router = failing_router(true);
        let (status, body) = send(&router, "POST", "/transactions", Some(rent())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Erro interno ao criar transação.");
        assert_eq!(body["error"], "connection refused");
    }
}
