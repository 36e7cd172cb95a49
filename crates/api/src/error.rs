//! Boundary translation from domain errors to HTTP responses.
//!
//! Handlers return `Result<_, ApiError>`; this is the only place an error
//! kind is mapped to a status code and body.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use talent_core::{talent::SubmissionError, upload::UploadError};
use talent_shared::{AppError, EmailError};
use tracing::{error, warn};

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        Self(err.into())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self(err.into())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match err.summary() {
            Some(summary) => {
                error!(code = err.error_code(), error = %err, "Error processing request");
                json!({
                    "message": summary,
                    "error": err.to_string()
                })
            }
            None => {
                warn!(code = err.error_code(), message = %err, "Request rejected");
                json!({ "message": err.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError(AppError::Internal(detail)).into_response()
}
