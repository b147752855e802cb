use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_config::ConfigError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Vector index error: {0}")]
    Backend(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, VectorError::CollectionNotFound(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            VectorError::CollectionNotFound(_) => StatusCode::NOT_FOUND,
            VectorError::Validation(_) => StatusCode::BAD_REQUEST,
            VectorError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
            VectorError::Embedding(_) | VectorError::Config(_) | VectorError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable identifier used in error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            VectorError::CollectionNotFound(_) => "NOT_FOUND",
            VectorError::Validation(_) => "BAD_INPUT",
            VectorError::Backend(_) => "INDEX_UNAVAILABLE",
            VectorError::Embedding(_) => "EMBEDDING_ERROR",
            VectorError::Config(_) => "CONFIG_ERROR",
            VectorError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<reqwest::Error> for VectorError {
    fn from(err: reqwest::Error) -> Self {
        VectorError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        VectorError::Internal(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for VectorError {
    fn from(err: ConfigError) -> Self {
        VectorError::Config(err.to_string())
    }
}

/// Error body returned for hard failures
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier, e.g. "NOT_FOUND"
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for VectorError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error_code = self.error_code(), "{}", self);
        } else {
            tracing::info!(error_code = self.error_code(), "{}", self);
        }

        let body = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
