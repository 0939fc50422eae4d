use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::store::StoreError;
use crate::utils::response::error as error_response;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failures collected across all fields of a request.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    fn as_details(&self) -> serde_json::Value {
        serde_json::json!(self.0)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Organizers cannot be attendees")]
    OrganizerCannotAttend,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::OrganizerCannotAttend
            | AppError::AlreadyRegistered => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::OrganizerCannotAttend => "ORGANIZER_CANNOT_ATTEND",
            AppError::AlreadyRegistered => "ALREADY_REGISTERED",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            other => {
                debug!(error = %other, code = other.code(), "Request rejected");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level messages to the client
        let (message, details) = match &self {
            AppError::Validation(errors) => {
                ("Validation failed".to_string(), Some(errors.as_details()))
            }
            AppError::Unauthenticated(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => {
                (msg.clone(), None)
            }
            AppError::OrganizerCannotAttend | AppError::AlreadyRegistered => {
                (self.to_string(), None)
            }
            AppError::Database(_) => ("A database error occurred".to_string(), None),
        };

        error_response(code, message, details, status)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EventNotFound => AppError::NotFound("Event no longer exists".to_string()),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_style_rejections_are_bad_requests() {
        assert_eq!(
            AppError::OrganizerCannotAttend.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AlreadyRegistered.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_credentials_are_forbidden_not_unauthorized() {
        let err = AppError::Unauthenticated("no credentials".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn store_miss_maps_to_not_found() {
        let err = AppError::from(StoreError::EventNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
