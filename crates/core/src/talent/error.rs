//! Submission error types.

use talent_shared::AppError;
use thiserror::Error;

/// Errors raised while turning raw form fields into a submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// Required fields were absent from the form.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        Self::Validation(err.to_string())
    }
}
