//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use switchboard_core::router::RouterError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation store failure.
    Storage(RouterError),
    /// Bad request input.
    Validation(String),
}

impl From<RouterError> for AppError {
    fn from(e: RouterError) -> Self {
        AppError::Storage(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();
        match self {
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure in API request");
                ApiResponse::error(
                    "STORAGE_UNAVAILABLE",
                    "conversation storage is unavailable",
                    request_id,
                )
                .into_response()
            }
            AppError::Validation(msg) => {
                ApiResponse::error("VALIDATION_ERROR", &msg, request_id).into_response()
            }
        }
    }
}
