//! Gemini `generateContent` client

use async_trait::async_trait;
use pretalab_config::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{GenerationError, GenerationResult, TextGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";
const INVALID_KEY_MESSAGE: &str = "API key not valid";
const INVALID_KEY_REASON: &str = "API_KEY_INVALID";

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

impl<'a> GenerateRequest<'a> {
    /// A fresh conversation holding one user turn
    pub fn single_turn(prompt: &'a str, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { max_output_tokens },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

// ==================== Response Handling ====================

/// Extract the generated text from a successful response body.
/// All text parts of the first candidate are concatenated.
pub fn extract_text(body: &str) -> GenerationResult<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::other(format!("malformed Gemini response: {}", e)))?;

    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(GenerationError::other(format!("Gemini returned no text: {}", reason)));
        }
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "empty candidate".to_string());
        return Err(GenerationError::other(format!("Gemini returned no text: {}", reason)));
    }
    Ok(text)
}

/// Classify a non-success response
pub fn classify_error(status: u16, body: &str) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let rejected_key = parsed.as_ref().map_or(false, |envelope| {
        envelope.error.message.contains(INVALID_KEY_MESSAGE)
            || envelope
                .error
                .details
                .iter()
                .any(|detail| detail.reason.as_deref() == Some(INVALID_KEY_REASON))
    });

    let message = match parsed {
        Some(envelope) if !envelope.error.message.is_empty() => {
            format!("Gemini API error ({}): {}", status, envelope.error.message)
        }
        _ => format!("Gemini API error ({})", status),
    };

    if status == 401 || status == 403 || rejected_key {
        GenerationError::authentication(message)
    } else {
        GenerationError::other(message)
    }
}

// ==================== Client ====================

/// Gemini REST client
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn from_config(config: &GeminiConfig) -> GenerationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::other(format!("failed to build HTTP client: {}", e)))?;

        if config.api_key.is_empty() {
            log::warn!("GEMINI_API_KEY is not set; /gemini/generate will answer 401");
        }
        Ok(Self::with_http(http, config))
    }

    /// Use an already configured HTTP client
    pub fn with_http(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: endpoint(&config.base_url, &config.model),
            max_output_tokens: config.max_output_tokens,
        }
    }
}

fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        if self.api_key.is_empty() {
            return Err(GenerationError::authentication("API key is not configured"));
        }

        let request = GenerateRequest::single_turn(prompt, self.max_output_tokens);
        log::debug!("POST {} ({} prompt bytes)", self.endpoint, prompt.len());

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::other("Gemini request timed out")
                } else {
                    GenerationError::other(format!("Gemini request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::other(format!("failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }
        extract_text(&body)
    }
}
