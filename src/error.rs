// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! [`FieldError`] is the taxonomy of caller-input and concurrency-conflict
//! failures raised by the validation, sanitization and averaging pipeline.
//! [`AppError`] wraps it together with the infrastructure failures and maps
//! everything to an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures raised while validating or applying a field mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("required fields are missing: {0}")]
    MissingRequiredFields(String),

    #[error("{0} cannot be edited")]
    ImmutableField(String),

    #[error("{0} cannot be edited once users have been completing the adventure")]
    FieldLocked(String),

    #[error("{0} must be a number")]
    InvalidNumericFormat(String),

    #[error("malformed encoded value: {0}")]
    MalformedEncoding(String),

    #[error("{field} has changed since it was read (expected {expected}, found {actual})")]
    StaleAverage {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field} must be {expected}")]
    InvalidFieldShape {
        field: String,
        expected: &'static str,
    },

    #[error("unknown field: {0}")]
    UnknownField(String),
}

impl FieldError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::MissingRequiredFields(_) => "missing_required_fields",
            FieldError::ImmutableField(_) => "immutable_field",
            FieldError::FieldLocked(_) => "field_locked",
            FieldError::InvalidNumericFormat(_) => "invalid_numeric_format",
            FieldError::MalformedEncoding(_) => "malformed_encoding",
            FieldError::StaleAverage { .. } => "stale_average",
            FieldError::InvalidFieldShape { .. } => "invalid_field_shape",
            FieldError::UnknownField(_) => "unknown_field",
        }
    }

    pub(crate) fn shape(field: &str, expected: &'static str) -> Self {
        FieldError::InvalidFieldShape {
            field: field.to_string(),
            expected,
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Returns the underlying field error, if any.
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            AppError::Field(err) => Some(err),
            _ => None,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
    status_code: u16,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Field(err @ FieldError::StaleAverage { .. }) => {
                (StatusCode::CONFLICT, err.code(), err.to_string())
            }
            AppError::Field(err) => (StatusCode::NOT_ACCEPTABLE, err.code(), err.to_string()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
