//! Text generation provider abstraction.
//!
//! The handler talks to the remote model only through [`TextProvider`], so the
//! Gemini client can be swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Conversation;

/// Error type for provider operations.
///
/// Variants exist for logging and metrics; callers of the HTTP API only ever
/// see a generic failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::NetworkError(_) => "network",
            ProviderError::Timeout => "timeout",
            ProviderError::ApiError { .. } => "api",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Generation options requested per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationParams {
    /// Ask the model to ground its answer with web search. Best effort: a
    /// provider without search ignores it.
    pub enable_search: bool,
}

/// Trait for chat-style text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `message` as a new user turn on top of `conversation` and return
    /// the model's reply text.
    async fn send_message(
        &self,
        conversation: &Conversation<'_>,
        message: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;

    /// Whether the provider has what it needs to make calls (credentials etc.).
    fn is_configured(&self) -> bool;

    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Model identifier for logs and metrics.
    fn model(&self) -> &str;
}
