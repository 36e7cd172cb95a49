//! Talent application submission route.
//!
//! `POST /sendTalentData` takes a multipart form with the applicant's text
//! fields and an optional `resume` file, and forwards it to the admin inbox.

use axum::{
    Json, Router,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use talent_core::{
    talent::{FormSubmission, RawSubmission},
    upload::{StoredUpload, UploadError, UploadFilter},
};
use talent_shared::{AppError, MailAttachment};
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

/// Name of the single accepted file field.
pub const RESUME_FIELD: &str = "resume";

/// Creates the talent routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sendTalentData", post(send_talent_data))
}

// ============================================================================
// Response Types
// ============================================================================

/// Submitted fields echoed back to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEcho {
    /// The parsed form fields.
    #[serde(flatten)]
    pub submission: FormSubmission,
    /// Stored filename of the resume, if one was uploaded.
    pub resume_file: Option<String>,
}

/// Success response.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// Confirmation message.
    pub message: &'static str,
    /// Echo of what was submitted.
    pub data: SubmissionEcho,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/sendTalentData`
async fn send_talent_data(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let multipart = multipart.map_err(|e| AppError::Upload(e.body_text()))?;
    let (raw, resume) = read_form(&state.uploads, multipart).await?;

    let outcome = deliver(&state, &raw, resume.clone()).await;

    if let Some(stored) = &resume
        && !state.uploads.config().retain_after_send
    {
        discard_quietly(&state.uploads, stored).await;
    }

    let submission = outcome?;
    let resume_file = submission.resume.as_ref().map(|r| r.stored_name.clone());

    info!(
        applicant = %submission.full_name(),
        resume = ?resume_file,
        "Talent application received"
    );

    Ok(Json(SubmissionResponse {
        message: "Form submitted successfully",
        data: SubmissionEcho {
            submission,
            resume_file,
        },
    }))
}

/// Type the form, attach the resume, and send it.
async fn deliver(
    state: &AppState,
    raw: &RawSubmission,
    resume: Option<StoredUpload>,
) -> Result<FormSubmission, ApiError> {
    let submission = FormSubmission::from_raw(raw, resume)?;

    let attachment = match &submission.resume {
        Some(stored) => Some(MailAttachment {
            filename: stored.original_name.clone(),
            content_type: stored.content_type.clone(),
            content: state.uploads.load(stored).await?,
        }),
        None => None,
    };

    state.dispatcher.dispatch(&submission, attachment).await?;
    Ok(submission)
}

// ============================================================================
// Multipart Parsing
// ============================================================================

/// Collect text fields and run the resume through the upload filter.
///
/// A stored resume is removed again if a later part fails.
async fn read_form(
    uploads: &UploadFilter,
    mut multipart: Multipart,
) -> Result<(RawSubmission, Option<StoredUpload>), ApiError> {
    let mut raw = RawSubmission::new();
    let mut resume = None;

    if let Err(e) = collect_parts(uploads, &mut multipart, &mut raw, &mut resume).await {
        if let Some(stored) = &resume {
            discard_quietly(uploads, stored).await;
        }
        return Err(e);
    }

    Ok((raw, resume))
}

async fn collect_parts(
    uploads: &UploadFilter,
    multipart: &mut Multipart,
    raw: &mut RawSubmission,
    resume: &mut Option<StoredUpload>,
) -> Result<(), ApiError> {
    let max = uploads.config().max_file_size;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, max))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(filename) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(|e| multipart_error(&e, max))?;
            raw.insert(name, value);
            continue;
        };

        if name != RESUME_FIELD || resume.is_some() {
            return Err(UploadError::UnexpectedField(name).into());
        }
        // "no file chosen" arrives as an empty filename
        if filename.is_empty() {
            continue;
        }

        *resume = Some(store_file(uploads, field, &filename, max).await?);
    }

    Ok(())
}

async fn store_file(
    uploads: &UploadFilter,
    mut field: Field<'_>,
    filename: &str,
    max: u64,
) -> Result<StoredUpload, ApiError> {
    let mut pending = uploads.begin(filename).await?;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => pending.write(chunk).await?,
            Ok(None) => break,
            Err(e) => {
                pending.cancel().await;
                return Err(multipart_error(&e, max));
            }
        }
    }

    Ok(pending.finish().await?)
}

/// A body cut off by the request limit counts as an oversized file.
fn multipart_error(err: &MultipartError, max: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { max_bytes: max }.into()
    } else {
        UploadError::Malformed(err.body_text()).into()
    }
}

async fn discard_quietly(uploads: &UploadFilter, stored: &StoredUpload) {
    if let Err(e) = uploads.discard(stored).await {
        warn!(stored_name = %stored.stored_name, error = %e, "Failed to remove upload");
    }
}
