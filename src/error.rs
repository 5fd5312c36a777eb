//! Application error type and its HTTP mapping.
//!
//! Core failures ([`AppError::InvalidUrl`], [`AppError::AliasAlreadyExists`],
//! [`AppError::UrlNotFound`]) are raised by the allocator and travel unchanged up to
//! the handler boundary, where [`IntoResponse`] turns them into status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::url_normalizer::UrlValidationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input failed URL normalization or validation.
    #[error("{0}")]
    InvalidUrl(String),

    /// A caller-supplied alias collides with an existing record.
    #[error("Alias already exists: {0}")]
    AliasAlreadyExists(String),

    /// No record exists for the alias.
    #[error("URL not found for alias: {0}")]
    UrlNotFound(String),

    /// Request body failed shape validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Storage or other infrastructure failure.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::AliasAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::UrlNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its client-facing payload.
    ///
    /// Details of internal errors are replaced by an empty object.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            AppError::InvalidUrl(_) => ("invalid_url", json!({})),
            AppError::AliasAlreadyExists(alias) => {
                ("alias_already_exists", json!({ "alias": alias }))
            }
            AppError::UrlNotFound(alias) => ("url_not_found", json!({ "alias": alias })),
            AppError::Validation { details, .. } => ("validation_error", details.clone()),
            AppError::Internal { .. } => ("internal_error", json!({})),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal { message, details } => {
                tracing::error!(%details, "{}", message);
            }
            other => tracing::warn!(status = status.as_u16(), "{}", other),
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UrlValidationError> for AppError {
    fn from(err: UrlValidationError) -> Self {
        AppError::InvalidUrl(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_else(|_| json!({})),
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal("Database error", json!({ "reason": err.to_string() }))
    }
}
