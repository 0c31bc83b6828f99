//! Error types for InkSign API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inksign_core::SignError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid PDF: {0}")]
    InvalidDocument(String),

    #[error("{0}")]
    PageNotFound(String),

    #[error("{0}")]
    InvalidStroke(String),

    #[error("Signing timed out after {0}ms")]
    Timeout(u128),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SignError> for ApiError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Parse(msg) => ApiError::InvalidDocument(msg),
            e @ SignError::PageNotFound { .. } => ApiError::PageNotFound(e.to_string()),
            e @ SignError::InvalidStroke { .. } => ApiError::InvalidStroke(e.to_string()),
            e @ SignError::Serialize(_) => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::DocumentNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("PDF not found: {}", id))
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid PDF: {}", msg),
            ),
            ApiError::PageNotFound(msg) | ApiError::InvalidStroke(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Timeout(ms) => (
                StatusCode::REQUEST_TIMEOUT,
                format!("Signing timed out after {}ms", ms),
            ),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_sign_errors_map_to_client_statuses() {
        assert_eq!(
            status_of(SignError::Parse("bad xref".into()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(
                SignError::PageNotFound {
                    index: 4,
                    page_count: 1
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                SignError::InvalidStroke {
                    index: 0,
                    reason: "stroke has no points".into()
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_serialize_error_is_internal() {
        let err: ApiError = SignError::Serialize("writer failed".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            status_of(ApiError::DocumentNotFound("abc".into())),
            StatusCode::NOT_FOUND
        );
    }
}
