//! Error type system for Label Desk
//!
//! Every fallible path in the backend returns [`DeskError`]. Each variant maps to
//! an HTTP status and a stable, machine-readable error code which is the only
//! thing the client sees; the human-readable detail goes to the log.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main error type for the Label Desk backend
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    // Storage errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    // Request errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Login already exists: {0}")]
    LoginAlreadyExists(String),

    #[error("Cannot delete the authenticated account")]
    CannotDeleteSelf,

    #[error("Request timed out")]
    Timeout,

    // Internal errors
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeskError::InvalidInput(_) | DeskError::CannotDeleteSelf => StatusCode::BAD_REQUEST,

            DeskError::InvalidCredentials | DeskError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }

            DeskError::Forbidden(_) => StatusCode::FORBIDDEN,

            DeskError::NotFound(_) => StatusCode::NOT_FOUND,

            DeskError::LoginAlreadyExists(_) => StatusCode::CONFLICT,

            DeskError::Timeout => StatusCode::REQUEST_TIMEOUT,

            DeskError::DatabaseError(_)
            | DeskError::PoolError(_)
            | DeskError::HashingError(_)
            | DeskError::TokenError(_)
            | DeskError::IoError(_)
            | DeskError::TaskError(_)
            | DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code sent to API clients
    pub fn code(&self) -> &'static str {
        match self {
            DeskError::InvalidInput(_) => "INVALID_INPUT",
            DeskError::InvalidCredentials => "INVALID_CREDENTIALS",
            DeskError::Unauthorized(_) => "UNAUTHORIZED",
            DeskError::Forbidden(_) => "FORBIDDEN",
            DeskError::NotFound(_) => "NOT_FOUND",
            DeskError::LoginAlreadyExists(_) => "LOGIN_ALREADY_EXISTS",
            DeskError::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            DeskError::Timeout => "REQUEST_TIMEOUT",
            DeskError::DatabaseError(_)
            | DeskError::PoolError(_)
            | DeskError::HashingError(_)
            | DeskError::TokenError(_)
            | DeskError::IoError(_)
            | DeskError::TaskError(_)
            | DeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is the client's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error body returned by every API endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn from_error(error: &DeskError) -> Self {
        Self {
            error: error.code().to_string(),
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if self.is_client_error() {
            tracing::warn!(code = self.code(), status_code = %status_code, "Request rejected: {}", self);
        } else {
            tracing::error!(code = self.code(), status_code = %status_code, "Request failed: {}", self);
        }

        (status_code, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

impl From<JsonRejection> for DeskError {
    fn from(rejection: JsonRejection) -> Self {
        DeskError::InvalidInput(rejection.body_text())
    }
}

/// Result type alias for operations that can fail with DeskError
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            DeskError::InvalidInput("login".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DeskError::CannotDeleteSelf.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(DeskError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            DeskError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(DeskError::Forbidden("role".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            DeskError::LoginAlreadyExists("bob".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DeskError::DatabaseError(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DeskError::InvalidInput("x".into()).code(), "INVALID_INPUT");
        assert_eq!(DeskError::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(DeskError::Unauthorized("x".into()).code(), "UNAUTHORIZED");
        assert_eq!(DeskError::LoginAlreadyExists("x".into()).code(), "LOGIN_ALREADY_EXISTS");
        assert_eq!(DeskError::CannotDeleteSelf.code(), "CANNOT_DELETE_SELF");
        assert_eq!(DeskError::TaskError("panic".into()).code(), "INTERNAL_ERROR");
        assert_eq!(DeskError::Timeout.code(), "REQUEST_TIMEOUT");
        assert_eq!(DeskError::Timeout.status_code(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let error = DeskError::TokenError("signing key rejected".into());
        let body = serde_json::to_value(ErrorResponse::from_error(&error)).unwrap();

        assert_eq!(body, serde_json::json!({ "error": "INTERNAL_ERROR" }));
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = DeskError::CannotDeleteSelf.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "CANNOT_DELETE_SELF");
    }
}
