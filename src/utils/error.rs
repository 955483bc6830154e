use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Body `error` field for every failure that is not the caller's fault.
pub const PROCESSING_FAILED: &str = "Failed to process the text";

#[derive(Error, Debug)]
pub enum GrammateError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Provider reply contained no text ({reason})")]
    EmptyReply { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl GrammateError {
    pub fn validation(message: impl Into<String>) -> Self {
        GrammateError::ValidationError {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GrammateError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GrammateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            GrammateError::ValidationError { message } => json!({ "error": message }),
            other => {
                tracing::error!(
                    status = status.as_u16(),
                    error = %other,
                    debug = ?other,
                    "Request failed"
                );
                json!({
                    "error": PROCESSING_FAILED,
                    "details": other.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GrammateError>;
