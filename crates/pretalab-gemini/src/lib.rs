//! Text generation
//!
//! [`TextGenerator`] is the seam the HTTP layer talks to; [`GeminiClient`] is the
//! production implementation over the Gemini REST API.

pub mod client;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use client::GeminiClient;

/// Generation failures, split by how the caller must report them
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Missing or rejected API key
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// Transport, quota, safety block, malformed response...
    #[error("{message}")]
    Other { message: String },
}

impl GenerationError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Single-turn text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt` with no prior conversation
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// Shared generator handle
pub type GeneratorRef = Arc<dyn TextGenerator>;
