use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;

use crate::models::{AskRequest, AskResponse, Conversation, SYSTEM_INSTRUCTION};
use crate::services::metrics::{record_ask_request, record_provider_error, record_provider_latency};
use crate::services::GenerationParams;
use crate::startup::AppState;

/// Answer one prompt through the configured text provider.
///
/// Each call starts a fresh conversation with no history. Provider failures
/// are logged here and reach the caller only as a generic 500.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let request = match payload {
        Ok(Json(request)) => Some(request),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ask body could not be read as JSON");
            None
        }
    };

    let Some(prompt) = request.as_ref().and_then(AskRequest::prompt) else {
        record_ask_request("bad_request");
        return Err(AppError::BadRequest(anyhow::anyhow!("prompt is required")));
    };

    let provider = &state.text_provider;
    let conversation = Conversation::new(SYSTEM_INSTRUCTION);
    let params = GenerationParams {
        enable_search: state.config.gemini.enable_search,
    };

    let start = Instant::now();
    let result = provider.send_message(&conversation, prompt, &params).await;
    record_provider_latency(provider.name(), provider.model(), start.elapsed().as_secs_f64());

    match result {
        Ok(text) => {
            tracing::info!(
                provider = provider.name(),
                model = provider.model(),
                prompt_len = prompt.len(),
                answer_len = text.len(),
                "Answered prompt"
            );
            record_ask_request("success");
            Ok(Json(AskResponse { text }))
        }
        Err(e) => {
            tracing::error!(
                provider = provider.name(),
                model = provider.model(),
                error_type = e.kind(),
                error = %e,
                "Text provider call failed"
            );
            record_provider_error(provider.name(), e.kind());
            record_ask_request("failure");
            Err(AppError::UpstreamFailure(e.into()))
        }
    }
}

pub async fn method_not_allowed() -> AppError {
    record_ask_request("method_not_allowed");
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
