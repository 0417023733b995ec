//! Mapping of service errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

use crate::errors::{RenderError, TranslationError};

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Upstream, rendering or storage failure
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            HttpError::Internal(message) => error!("Request failed: {}", message),
            HttpError::BadRequest(message) => warn!("Rejected request: {}", message),
            HttpError::NotFound(_) => {}
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<TranslationError> for HttpError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::Validation(message) => HttpError::BadRequest(message),
            other => HttpError::Internal(other.to_string()),
        }
    }
}

impl From<RenderError> for HttpError {
    fn from(err: RenderError) -> Self {
        HttpError::from(TranslationError::from(err))
    }
}
