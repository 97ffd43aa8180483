//! HTTP error type for the message endpoints.
//!
//! Handlers return `Result<T, ApiError>`; [`ApiError`] renders as a JSON
//! `{"error": "..."}` body. Persistence failures are logged in full but the
//! client only sees a generic message.

use crate::flash::ports::FlashRepositoryError;
use crate::flash::services::CatalogError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors produced by the message endpoints.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request reached a message route without passing through the
    /// storage layer.
    #[error("flash message storage is not installed on this router")]
    Misconfigured,

    /// The message does not exist in the caller's scope, or the page is out
    /// of range.
    #[error("not found: {0}")]
    NotFound(String),

    /// A query parameter could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The repository failed.
    #[error("repository error: {0}")]
    Repository(#[from] FlashRepositoryError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Domain(domain) => Self::BadRequest(domain.to_string()),
            CatalogError::Repository(repository) => Self::Repository(repository),
            CatalogError::NotFound(_) => Self::NotFound("Not found.".to_owned()),
            CatalogError::DeleteUnread(_) => Self::Forbidden(
                "You do not have the permission to delete unread messages".to_owned(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            Self::Misconfigured => {
                error!("message route called without the flash storage layer");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "flash message storage is not installed; wrap the message routes with \
                     the install_storage middleware"
                        .to_owned(),
                )
            }
            Self::Repository(err) => {
                error!(error = %err, "flash message repository error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
