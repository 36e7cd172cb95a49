//! Talent application handling.
//!
//! This module turns a raw form into a typed [`FormSubmission`], renders the
//! notification email, and dispatches it to the admin inbox.

mod dispatch;
mod error;
mod template;
mod types;

pub use dispatch::TalentDispatcher;
pub use error::SubmissionError;
pub use template::render_email;
pub use types::{FormSubmission, REQUIRED_FIELDS, RawSubmission, parse_consent};
