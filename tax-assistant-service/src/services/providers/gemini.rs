//! Gemini AI provider implementation.
//!
//! Calls `models/{model}:generateContent` with a system instruction and the
//! prompt as the only user turn.

use std::time::Duration;

use super::{GenerationParams, ProviderError, TextProvider};
use crate::models::Conversation;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key. Keeps the credential out of request URLs,
/// which end up in proxy and tracing logs.
const API_KEY_HEADER: &str = "x-goog-api-key";

const USER_ROLE: &str = "user";

/// Upper bound on how much of an upstream error body is copied into logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and the given method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn send_message(
        &self,
        conversation: &Conversation<'_>,
        message: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let request = GenerateContentRequest::new(conversation, message, params);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            prompt_len = message.len(),
            search = params.enable_search,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        let api_response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        api_response.into_text()
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.expose_secret().trim().is_empty()
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() {
        ProviderError::InvalidResponse(e.to_string())
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Pull the human-readable message out of a Gemini error envelope, falling
/// back to a truncated copy of the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{}: {}", status, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

impl GenerateContentRequest {
    fn new(conversation: &Conversation<'_>, message: &str, params: &GenerationParams) -> Self {
        let tools = if params.enable_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            system_instruction: Content::text(None, conversation.system_instruction()),
            contents: vec![Content::text(Some(USER_ROLE), message)],
            tools,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Only text parts matter here; other part kinds deserialize with `text: None`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String, ProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            if self
                .prompt_feedback
                .is_some_and(|feedback| feedback.block_reason.is_some())
            {
                return Err(ProviderError::ContentFiltered);
            }
            return Err(ProviderError::InvalidResponse(
                "Response contained no candidates".to_string(),
            ));
        };

        if matches!(
            candidate.finish_reason.as_deref(),
            Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST")
        ) {
            return Err(ProviderError::ContentFiltered);
        }

        let text: String = candidate
            .content
            .unwrap_or_default()
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "Response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
