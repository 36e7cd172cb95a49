//! Upload error types.

use talent_shared::AppError;
use thiserror::Error;

/// Upload filter errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Filename suffix is not on the allow-list.
    #[error("Invalid file type. Only {allowed} files are allowed.")]
    UnsupportedType {
        /// Human-readable allow-list, e.g. `PDF, DOC, and DOCX`.
        allowed: String,
    },

    /// File exceeds the configured cap.
    #[error("File size too large. Maximum size is {}MB.", .max / (1024 * 1024))]
    FileTooLarge {
        /// Maximum allowed size in bytes.
        max: u64,
    },

    /// A file arrived in a field other than the single accepted one.
    #[error("Unexpected field")]
    UnexpectedField(String),

    /// The multipart body could not be read.
    #[error("{0}")]
    Malformed(String),

    /// Writing, reading, or removing the stored file failed.
    #[error("upload storage failed: {0}")]
    Storage(String),
}

impl UploadError {
    /// Create a storage error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an unsupported type error listing the accepted suffixes.
    #[must_use]
    pub fn unsupported_type(allowed_extensions: &[String]) -> Self {
        Self::UnsupportedType {
            allowed: describe_allowed(allowed_extensions),
        }
    }
}

impl From<opendal::Error> for UploadError {
    fn from(err: opendal::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::FileTooLarge { max } => Self::PayloadTooLarge { max_bytes: max },
            UploadError::Storage(msg) => Self::Internal(msg),
            other => Self::Upload(other.to_string()),
        }
    }
}

/// `[".pdf", ".doc", ".docx"]` becomes `PDF, DOC, and DOCX`.
fn describe_allowed(extensions: &[String]) -> String {
    let names: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_uppercase())
        .collect();

    match names.as_slice() {
        [] => "no".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
