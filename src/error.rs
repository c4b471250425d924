//! # error
//!
//! Centralised error types.
//!
//! * [`MarketError`] — news pool misconfiguration, fatal at startup.
//! * [`ChatError`]   — anything that goes wrong talking to Gemini. Never
//!   leaves the chat adapter; it is logged and replaced by a fallback reply.
//! * [`AppError`]    — returned by every handler. Axum's `IntoResponse` impl
//!   converts it into a structured JSON error body so the dashboard always
//!   gets a machine-readable response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("news pool is empty")]
    EmptyNewsPool,

    #[error("news pool has {have} headlines, need at least {need}")]
    NewsPoolTooSmall { have: usize, need: usize },
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Gemini returned no text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource (e.g. the first market context) does not exist yet.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
