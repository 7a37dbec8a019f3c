//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// Missing or invalid configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Airport code could not be resolved upstream
    #[error("Could not resolve airport '{code}': {reason}")]
    Resolution {
        code: String,
        reason: String,
    },

    /// Upstream API returned a non-success status
    #[error("Upstream API returned status {status}")]
    Upstream {
        status: u16,
        payload: serde_json::Value,
    },

    /// HTTP client error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request body refused before any handler logic (size, content type)
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
    },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
    /// Details (upstream payload, offending code, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Upstream status code, when the failure came from upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Resolution { .. } => StatusCode::BAD_GATEWAY,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            AppError::Configuration(_)
            | AppError::Network(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error kind string
    pub fn error_kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Configuration(_) => "configuration_error",
            AppError::Resolution { .. } => "resolution_error",
            AppError::Upstream { .. } => "upstream_error",
            AppError::Rejected { .. } => "request_rejected",
            AppError::Network(_) => "network_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::NotFound(_) => "not_found_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the failure is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to the JSON error body
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::Upstream { status, payload } => ErrorResponse {
                error: self.to_string(),
                details: Some(payload.clone()),
                status: Some(*status),
            },
            AppError::Resolution { code, .. } => ErrorResponse {
                error: self.to_string(),
                details: Some(serde_json::json!({ "code": code })),
                status: None,
            },
            _ => ErrorResponse {
                error: self.to_string(),
                details: None,
                status: None,
            },
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Request failed: {} ({}) - Status code: {}", self, self.error_kind(), status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Oversized bodies and wrong content types keep their own status
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            status @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => AppError::Rejected {
                status: status.as_u16(),
                message: rejection.body_text(),
            },
            _ => AppError::Validation(rejection.body_text()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create resolution error
    pub fn resolution_error(code: impl Into<String>, reason: impl Into<String>) -> AppError {
        AppError::Resolution {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Build an upstream error from a status and raw body text
    ///
    /// The body is kept as JSON when it parses, otherwise as a string.
    pub fn upstream_error(status: u16, body: &str) -> AppError {
        let payload = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        AppError::Upstream { status, payload }
    }
}

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add validation error context
    fn validation_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn validation_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }
}
