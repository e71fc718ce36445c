//! HTTP surface for the bulk coordinator and the read-only passthroughs.

pub mod app;
pub mod handlers;
pub mod state;

use crate::core::{MutationError, StoreError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::info;

pub use app::build_router;
pub use state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Store(StoreError),
    Input(String),
    NotFound(String),
    /// Request-level rejection answered with a bare 400 and no body.
    UnknownOperation(String),
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        WebError::Store(err)
    }
}

impl From<MutationError> for WebError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Validation(message) => Self::Input(message),
            MutationError::NotFound(message) => Self::NotFound(message),
            MutationError::Store(err) => Self::Store(err),
        }
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Input(rejection.body_text())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::UnknownOperation(operation) => {
                info!(%operation, "rejecting unknown bulk operation");
                return StatusCode::BAD_REQUEST.into_response();
            }
            WebError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                "store_error".to_string(),
            ),
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "input_error".to_string()),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found".to_string()),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
