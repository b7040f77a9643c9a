//! Unified API error handling for the BotPad proxy.
//!
//! Every failure inside request handling is an [`ApiError`] kind; the
//! `IntoResponse` impl is the single point where kinds become HTTP status
//! codes and JSON bodies. Validation, configuration, crypto, and transport
//! failures all answer 400 with `{"error": message}`. GitHub failures keep
//! GitHub's original status code and carry its parsed body under `details`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad caller input: malformed repo, missing required field.
    #[error("{0}")]
    Validation(String),

    /// A required secret or token is absent.
    #[error("{0}")]
    Config(String),

    /// PEM parsing or JWT signing failed.
    #[error("{0}")]
    Crypto(String),

    /// GitHub answered non-2xx; `details` is its parsed response body.
    #[error("GitHub API {status}: {details}")]
    Upstream { status: u16, details: Value },

    /// GitHub sent 2xx but the body did not have the expected shape.
    #[error("Unexpected GitHub response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The upstream call never completed (DNS, TLS, connect, ...).
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn upstream(status: u16, details: Value) -> Self {
        Self::Upstream { status, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream { status, details } => {
                tracing::warn!(status, "GitHub API error");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    status,
                    Json(json!({ "error": "GitHub error", "details": details })),
                )
                    .into_response()
            }
            err => {
                tracing::warn!(error = %err, "Request failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
