use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure here is scoped to a single request; nothing is fatal to the
/// process. Envelopes always carry `success: false` so the public lookup
/// contract can be checked without inspecting HTTP status alone.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The extraction oracle was unreachable or returned an API error.
    /// Safe to retry by re-uploading.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The oracle responded but its output was not parseable even after
    /// fence stripping. Carries the raw text for diagnostics. Not retried
    /// automatically; must never be coerced into a default-filled record.
    #[error("Extraction response could not be decoded: {message}")]
    ExtractionDecode { message: String, raw: String },

    /// Connectivity-class failures map to 503 (`STORAGE_UNAVAILABLE`),
    /// everything else to a generic 500.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::ExtractionFailed(msg) => {
                tracing::error!("Extraction failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_FAILED",
                    "Resume extraction failed".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::ExtractionDecode { message, raw } => {
                tracing::error!("Extraction decode failed: {message}; raw: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_DECODE",
                    "Failed to parse extraction response as JSON".to_string(),
                    Some(raw.clone()),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                if is_connectivity_error(e) {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORAGE_UNAVAILABLE",
                        "Database connection error".to_string(),
                        None,
                    )
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        "A database error occurred".to_string(),
                        None,
                    )
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = json!(details);
        }

        let body = Json(json!({
            "success": false,
            "error": error
        }));

        (status, body).into_response()
    }
}

/// Connectivity-class storage failures get 503 so callers can show a
/// "try again later" message, distinct from generic 500.
fn is_connectivity_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    )
}
