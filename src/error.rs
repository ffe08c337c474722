use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Errors surfaced by services and HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(err) => err.status_code(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Resource not found".to_string()),
            StoreError::Conflict(detail) => AppError::Conflict(detail),
            StoreError::InvalidReference(detail) => {
                tracing::debug!(%detail, "rejected write with dangling reference");
                AppError::Validation("Referenced exercise does not exist".to_string())
            }
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Maps a store `NotFound` to a message naming the missing resource.
pub trait OrNotFound<T> {
    fn or_not_found(self, message: &str) -> Result<T, AppError>;
}

impl<T> OrNotFound<T> for Result<T, StoreError> {
    fn or_not_found(self, message: &str) -> Result<T, AppError> {
        self.map_err(|err| match err {
            StoreError::NotFound => AppError::NotFound(message.to_string()),
            other => other.into(),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error, message) = match self {
            AppError::Auth(err) => return err.into_response(),
            AppError::Validation(detail) => ("Validation failed".to_string(), detail),
            AppError::NotFound(message) => (message.clone(), message),
            AppError::Conflict(message) => (message.clone(), message),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                internal_body()
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal failure");
                internal_body()
            }
        };

        let body = Json(json!({
            "error": error,
            "message": message,
        }));

        (status, body).into_response()
    }
}

fn internal_body() -> (String, String) {
    (
        "Internal server error".to_string(),
        "An unexpected error occurred".to_string(),
    )
}
