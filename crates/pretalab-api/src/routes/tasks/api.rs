//! Tasks API endpoints
//!
//! Endpoints:
//! - list_tasks: GET /tasks
//! - get_task: GET /tasks/:id
//! - create_task: POST /tasks
//! - update_task: PUT /tasks/:id
//! - delete_task: DELETE /tasks/:id

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pretalab_core::Task;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::routes::{self, ResourceMessages};
use crate::AppState;

pub const MESSAGES: ResourceMessages = ResourceMessages {
    invalid_id: "ID de tarefa inválido.",
    not_found: "Tarefa não encontrada",
    list_failed: "Erro interno ao buscar tarefas.",
    get_failed: "Erro interno ao buscar tarefa.",
    create_failed: "Erro interno ao criar tarefa.",
    update_failed: "Erro interno ao atualizar tarefa.",
    delete_failed: "Erro interno ao deletar tarefa.",
};

/// List every task
pub async fn list_tasks(state: State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    routes::list(&state, state.store.tasks(), &MESSAGES).await
}

pub async fn get_task(
    state: State<AppState>,
    path: Path<String>,
) -> Result<Json<Task>, ApiError> {
    routes::get(&state, state.store.tasks(), &MESSAGES, &path).await
}

pub async fn create_task(
    state: State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    routes::create(&state, state.store.tasks(), &MESSAGES, body).await
}

/// Merge the supplied fields into the task
pub async fn update_task(
    state: State<AppState>,
    path: Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<Task>, ApiError> {
    routes::update(&state, state.store.tasks(), &MESSAGES, &path, patch).await
}

pub async fn delete_task(
    state: State<AppState>,
    path: Path<String>,
) -> Result<StatusCode, ApiError> {
    routes::delete(&state, state.store.tasks(), &MESSAGES, &path).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_router, ABSENT_ID};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_list_empty() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_defaults_completed() {
        let router = test_router();
        let (status, body) =
            send(&router, "POST", "/tasks", Some(json!({ "title": "Buy milk" }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
        assert_eq!(body["_id"].as_str().unwrap().len(), 24);
        assert!(body["createdAt"].is_string());
        assert!(body["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_create_without_title() {
        let router = test_router();
        let (status, body) = send(&router, "POST", "/tasks", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("obrigatório"));
        assert_eq!(
            message,
            "Task validation failed: title: O título da tarefa é obrigatório."
        );
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_create_then_get_and_list() {
        let router = test_router();
        let (_, first) = send(&router, "POST", "/tasks", Some(json!({ "title": "Comprar leite" }))).await;
        let (_, second) = send(
            &router,
            "POST",
            "/tasks",
            Some(json!({ "title": "Pagar contas", "completed": true })),
        )
        .await;
        assert_ne!(first["_id"], second["_id"]);

        let uri = format!("/tasks/{}", second["_id"].as_str().unwrap());
        let (status, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, second);

        let (_, list) = send(&router, "GET", "/tasks", None).await;
        assert_eq!(list, json!([first, second]));
    }

    #[tokio::test]
    async fn test_get_malformed_and_absent() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/tasks/123", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "ID de tarefa inválido." }));

        let (status, body) = send(&router, "GET", &format!("/tasks/{}", ABSENT_ID), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Tarefa não encontrada" }));
    }

    #[tokio::test]
    async fn test_update_reflects_changes() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/tasks", Some(json!({ "title": "Old" }))).await;
        let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

        let (status, updated) = send(
            &router,
            "PUT",
            &uri,
            Some(json!({ "completed": true, "_id": ABSENT_ID })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["_id"], created["_id"]);
        assert_eq!(updated["title"], "Old");
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (_, fetched) = send(&router, "GET", &uri, None).await;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_invalid_and_missing() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/tasks", Some(json!({ "title": "Old" }))).await;
        let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&router, "PUT", &uri, Some(json!({ "title": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Validation failed: title:"));

        let (status, _) = send(&router, "PUT", "/tasks/invalid-id", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/tasks/{}", ABSENT_ID),
            Some(json!({ "title": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Tarefa não encontrada");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let router = test_router();
        let (_, created) = send(&router, "POST", "/tasks", Some(json!({ "title": "Apagar" }))).await;
        let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&router, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&router, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&router, "DELETE", "/tasks/123", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ID de tarefa inválido.");
    }
}
