use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Export(ExportError::Pdf(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Export(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                ("STORAGE_ERROR", "A storage error occurred".to_string())
            }
            AppError::Export(ExportError::Pdf(msg)) => {
                tracing::error!("PDF assembly error: {msg}");
                ("EXPORT_ERROR", "Failed to generate the PDF".to_string())
            }
            AppError::Export(e) => {
                tracing::warn!("Export rejected: {e}");
                ("EXPORT_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
