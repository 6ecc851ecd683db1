//! # Centralized Error Handling
//!
//! This module provides a unified error handling system for the application.
//! It centralizes error logging and HTTP response generation, so handlers and
//! middleware can simply return [`AppResult`] and use `?`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::services::{jwt::JwtError, store::StoreError};

/// Failures of the session-token gate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie was presented.
    #[error("missing session token")]
    Unauthenticated,

    /// Bad signature, wrong secret, malformed token or past expiry.
    #[error("invalid or expired session token")]
    InvalidOrExpired,

    /// Valid token, but the caller asked for somebody else's records.
    #[error("caller identity does not match the requested owner")]
    Forbidden,
}

/// Central application error type that encompasses all possible error conditions.
///
/// This enum provides a unified way to handle errors across the application,
/// with automatic conversion to appropriate HTTP responses. _Store and token
/// errors are logged automatically, while other errors should be logged at the
/// point of creation if needed._
#[derive(Error, Debug)]
pub enum AppError {
    #[error("store error")]
    Store(#[from] StoreError),

    #[error("token error")]
    Token(#[from] JwtError),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("UUID parsing error")]
    Uuid(#[from] uuid::Error),

    #[error("bad request: {0}")]
    BadRequest(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(e) => error!(?e, "Store error occurred"),
            AppError::Token(e) => error!(?e, "Token error occurred"),
            _ => {}
        }

        let (status, message) = match self {
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::Token(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            AppError::Auth(AuthError::Unauthenticated | AuthError::InvalidOrExpired) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AppError::Auth(AuthError::Forbidden) => (StatusCode::FORBIDDEN, "Forbidden access!"),
            AppError::Uuid(_) => (StatusCode::BAD_REQUEST, "Invalid id format"),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorBody { message });
        (status, body).into_response()
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;
