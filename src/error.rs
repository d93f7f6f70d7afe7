// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain error taxonomy and the HTTP error envelope.
//!
//! Services return [`ServiceError`]; handlers convert it into [`ApiError`],
//! which renders `{ "success": false, "message": ..., "errors"?: [...] }`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::auth::PasswordError;
use crate::storage::DbError;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by the identity and wishlist services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("Email is already registered")]
    DuplicateEmail,

    /// Shared by unknown email, wrong password and wrong current password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal failure: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateEmail => ServiceError::DuplicateEmail,
            DbError::NotFound(resource) => ServiceError::NotFound(resource),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(e: PasswordError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

/// One message per field, sorted by field name. A `required` failure wins
/// over the other rules on the same field.
impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = e
            .field_errors()
            .into_iter()
            .filter_map(|(field, failures)| {
                let failure = failures
                    .iter()
                    .find(|f| f.code == "required")
                    .or_else(|| failures.first())?;
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                Some(FieldError::new(field.to_string(), message))
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::ValidationFailed(errors)
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
    /// Internal diagnostic, only rendered in the development posture.
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
            detail: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request("Validation failed")
        }
    }

    /// Generic 500. The detail is logged, and only echoed back with the `dev` feature.
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!(error = %detail, "Unexpected failure while handling request");
        Self {
            detail: Some(detail),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::ValidationFailed(errors) => ApiError::validation(errors),
            ServiceError::DuplicateEmail | ServiceError::InvalidInput(_) => {
                ApiError::bad_request(e.to_string())
            }
            ServiceError::InvalidCredentials => ApiError::unauthorized(e.to_string()),
            ServiceError::NotFound(_) => ApiError::not_found(e.to_string()),
            ServiceError::Internal(detail) => ApiError::internal(detail),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ServiceError::from(e).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(vec![FieldError::new("path", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = if cfg!(feature = "dev") {
            self.detail
        } else {
            None
        };
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            errors: self.errors,
            error,
        });
        (self.status, body).into_response()
    }
}
