// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Identity provider rejected a sign-in or sign-up; carries the
    /// provider's error code (e.g. `EMAIL_EXISTS`).
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map a known identity-provider error code to a fixed human-readable
    /// message. Unmapped codes fall back to a generic message.
    pub fn auth_message(code: &str) -> &'static str {
        // Provider codes sometimes carry a suffix, e.g.
        // "TOO_MANY_ATTEMPTS_TRY_LATER : ...". Match on the leading token.
        let code = code.split_whitespace().next().unwrap_or(code);
        match code {
            "EMAIL_EXISTS" => {
                "This email is already in use. Please use a different email or try logging in."
            }
            "INVALID_EMAIL" => "The email address is not valid.",
            "USER_DISABLED" => "This account has been disabled. Please contact support.",
            "EMAIL_NOT_FOUND" => {
                "No account found with this email. Please check your email or register."
            }
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                "Incorrect password. Please try again or reset your password."
            }
            "WEAK_PASSWORD" => "Password is too weak. Please use a stronger password.",
            "TOO_MANY_ATTEMPTS_TRY_LATER" => {
                "Too many unsuccessful login attempts. Please try again later."
            }
            _ => "An error occurred. Please try again.",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidSession => (StatusCode::UNAUTHORIZED, "invalid_session", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Auth(code) => (
                StatusCode::BAD_REQUEST,
                "auth_error",
                Some(Self::auth_message(code).to_string()),
            ),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::NotImplemented(msg) => (
                StatusCode::NOT_IMPLEMENTED,
                "not_implemented",
                Some((*msg).to_string()),
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_auth_codes_have_fixed_messages() {
        assert_eq!(
            AppError::auth_message("EMAIL_EXISTS"),
            "This email is already in use. Please use a different email or try logging in."
        );
        assert_eq!(
            AppError::auth_message("INVALID_PASSWORD"),
            "Incorrect password. Please try again or reset your password."
        );
        assert_eq!(
            AppError::auth_message("INVALID_LOGIN_CREDENTIALS"),
            "Incorrect password. Please try again or reset your password."
        );
        assert_eq!(
            AppError::auth_message("TOO_MANY_ATTEMPTS_TRY_LATER"),
            "Too many unsuccessful login attempts. Please try again later."
        );
    }

    #[test]
    fn test_suffixed_code_matches_leading_token() {
        assert_eq!(
            AppError::auth_message("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account..."),
            "Too many unsuccessful login attempts. Please try again later."
        );
    }

    #[test]
    fn test_unknown_auth_code_falls_back() {
        assert_eq!(
            AppError::auth_message("SOMETHING_NEW"),
            "An error occurred. Please try again."
        );
        assert_eq!(AppError::auth_message(""), "An error occurred. Please try again.");
    }
}
