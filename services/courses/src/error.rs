//! Custom error types for the course service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldError;

/// Message returned for every failure whose detail stays server-side
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Tag identifying the category of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    NotFound,
    Persistence,
    Internal,
}

impl ErrorKind {
    /// HTTP status for this kind of failure
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Persistence | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Custom error type for the course service
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Login with a wrong username or password
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// No `Authorization` header on a protected route
    #[error("Authorization not provided.")]
    Unauthorized,

    /// Bearer token malformed, expired or badly signed
    #[error("Invalid or expired token.")]
    Forbidden,

    /// Unknown resource
    #[error("{0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Any other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn course_not_found() -> Self {
        ApiError::NotFound("Course not found.".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::Unauthorized => ErrorKind::Unauthorized,
            ApiError::Forbidden => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Database(_) => ErrorKind::Persistence,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Database(_) | ApiError::Internal(_) => {
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
