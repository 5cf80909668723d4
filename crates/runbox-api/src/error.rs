//! Request-boundary error taxonomy. Every handler failure is converted
//! to a JSON `{error: ...}` body here; nothing crashes the process and
//! nothing leaks internals: store detail goes to the log, the caller
//! gets the generic per-route message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, surfaced as 400.
    #[error("{0}")]
    Validation(String),

    /// Bad login. Unknown email and wrong password are indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Identity already registered. On the wire this is the same generic
    /// body as any other registration failure; a taken email must not
    /// be detectable from the outside.
    #[error("identity already registered")]
    Conflict,

    /// Missing, malformed, expired, or forged bearer token, surfaced as 401.
    #[error("invalid or missing token")]
    Unauthorized,

    /// Missing resource, or one owned by someone else; 404 either way.
    #[error("{0}")]
    NotFound(String),

    /// Provider call failed. The provider's message rides along as
    /// `details`; the one place passthrough detail is allowed.
    #[error("code execution failed: {0}")]
    Execution(String),

    /// Persistence failure: 500 with the generic `context` message;
    /// the underlying error is logged server-side only.
    #[error("{context}")]
    Store {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn store(context: impl Into<String>, source: anyhow::Error) -> Self {
        ApiError::Store {
            context: context.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid email or password" }),
            ),
            ApiError::Conflict => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Registration failed" }),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or missing token" }),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Execution(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Code execution failed.", "details": details }),
            ),
            ApiError::Store { context, source } => {
                error!("{}: {:#}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": context }))
            }
        };

        (status, Json(body)).into_response()
    }
}
