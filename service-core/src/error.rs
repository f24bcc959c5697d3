use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to callers whenever an upstream dependency fails.
/// The underlying cause is logged, never serialized.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to process your request. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UpstreamFailure(_)
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status_code();
        let error = match self {
            AppError::BadRequest(err) => err.to_string(),
            AppError::NotFound => "Not found".to_string(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::UpstreamFailure(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
            AppError::ConfigError(_) => "Configuration error".to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
