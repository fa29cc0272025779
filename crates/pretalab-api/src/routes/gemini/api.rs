//! Gemini API endpoints
//!
//! Endpoints:
//! - generate_text: POST /gemini/generate

use axum::extract::State;
use axum::Json;
use pretalab_core::Body;
use pretalab_gemini::GenerationError;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

pub const PROMPT_REQUIRED: &str = "O prompt é obrigatório no corpo da requisição.";
pub const AUTHENTICATION_FAILED: &str = "Erro de autenticação com a API Gemini: Chave inválida ou ausente. Certifique-se de que a variável de ambiente GEMINI_API_KEY está configurada corretamente.";
pub const GENERATION_FAILED: &str = "Erro interno ao gerar texto com Gemini.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_text: String,
}

fn prompt(body: &Body) -> Option<&str> {
    match body.get("prompt") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Generate text for `{ "prompt": ... }`
pub async fn generate_text(
    state: State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = prompt(&body).ok_or_else(|| ApiError::bad_request(PROMPT_REQUIRED))?;

    match state.generator.generate(prompt).await {
        Ok(generated_text) => Ok(Json(GenerateResponse { generated_text })),
        Err(err @ GenerationError::Authentication { .. }) => {
            log::error!("Gemini authentication failed: {}", err);
            Err(ApiError::unauthorized(AUTHENTICATION_FAILED))
        }
        Err(err) => {
            log::error!("Gemini generation failed: {}", err);
            Err(ApiError::internal(GENERATION_FAILED, &err, state.expose_errors()))
        }
    }
}
