//! Application-wide error types.

use thiserror::Error;

use crate::email::EmailError;

/// Application error types.
///
/// Every failure of a submission ends up as one of these before it is
/// turned into an HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    /// Uploaded file exceeded the configured size cap.
    #[error("File size too large. Maximum size is {}MB.", .max_bytes / (1024 * 1024))]
    PayloadTooLarge {
        /// Configured cap in bytes.
        max_bytes: u64,
    },

    /// Upload rejected by the filter (type, unexpected field, malformed body).
    #[error("{0}")]
    Upload(String),

    /// Submission is missing required data.
    #[error("{0}")]
    Validation(String),

    /// The mail relay refused or failed to deliver the notification.
    #[error("{0}")]
    MailDelivery(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PayloadTooLarge { .. } | Self::Upload(_) | Self::Validation(_) => 400,
            Self::MailDelivery(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::Upload(_) => "UPLOAD_REJECTED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MailDelivery(_) => "MAIL_DELIVERY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing summary for server-side failures.
    ///
    /// `None` for client errors, whose own message is the summary.
    #[must_use]
    pub const fn summary(&self) -> Option<&'static str> {
        match self {
            Self::MailDelivery(_) => Some("Error processing form submission"),
            Self::Internal(_) => Some("Internal server error"),
            Self::PayloadTooLarge { .. } | Self::Upload(_) | Self::Validation(_) => None,
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::MailDelivery(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
