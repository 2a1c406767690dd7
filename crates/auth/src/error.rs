//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error.
///
/// `MissingToken` and `InvalidToken` are distinct variants for internal
/// logging but collapse to the same unauthorized response; clients learn
/// nothing about why a token failed.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    /// Authenticated, but role not in the allow-list
    Forbidden,
    /// Login attempts exhausted for the current window
    Throttled { retry_after_secs: u64 },
    TokenIssueFailed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken | AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You do not have permission to perform this action".to_string(),
            ),
            AuthError::Throttled { retry_after_secs } => {
                let body = Json(json!({
                    "error": {
                        "code": "RATE_LIMIT_EXCEEDED",
                        "message": "Too many login attempts. Please try again later.",
                    },
                    "retryAfterSeconds": retry_after_secs,
                }));
                return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            }
            AuthError::TokenIssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ISSUE_FAILED",
                "Failed to issue token".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for pricewatch_common::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken => {
                pricewatch_common::Error::Authentication("Authentication required".to_string())
            }
            AuthError::Forbidden => pricewatch_common::Error::Authorization(
                "You do not have permission to perform this action".to_string(),
            ),
            AuthError::Throttled { retry_after_secs } => pricewatch_common::Error::RateLimit(
                format!("Too many login attempts, retry in {retry_after_secs}s"),
            ),
            AuthError::TokenIssueFailed => {
                pricewatch_common::Error::Internal("Failed to issue token".to_string())
            }
        }
    }
}
