use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::validation::ValidationErrorResponse;

/// Helper to create a JSON error response with a standard `{ "message": text }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "message": message.into() });
    (status, Json(body)).into_response()
}

/// Error surface of the HTTP layer. Every handler failure is one of these;
/// nothing else escapes to the client.
pub enum ApiError {
    /// The request body could not be parsed at all.
    BadRequest(String),
    /// One or more fields failed their declared constraints.
    Validation(ValidationErrorResponse),
    /// The referenced record does not exist.
    NotFound(String),
    /// The record store failed underneath us. The message is client-safe;
    /// the underlying cause is logged where the error is raised.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(resp) => {
                let body = serde_json::json!({
                    "message": "Validation failed",
                    "errors": resp.errors,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => error_response(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ApiError::Validation(resp) => {
                write!(f, "Validation Error: {} errors", resp.errors.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("The user does not exist".into()),
            other => {
                tracing::error!(error = %other, "record store failure");
                ApiError::Internal("Internal server error".into())
            }
        }
    }
}
