//! Request body extraction

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use pretalab_core::Body;
use serde_json::Value;

use crate::error::ApiError;

pub const INVALID_BODY: &str = "Corpo da requisição inválido.";

/// A JSON object body. An empty body reads as `{}`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Body);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_BODY))?;
        parse_body(&bytes).map(JsonBody)
    }
}

pub fn parse_body(bytes: &[u8]) -> Result<Body, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Body::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Err(ApiError::bad_request(INVALID_BODY)),
    }
}
