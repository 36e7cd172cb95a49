//! Sends a rendered application to the admin inbox.

use std::sync::Arc;

use talent_shared::{EmailError, MailAttachment, MailRelay, OutgoingMail};

use super::template::render_email;
use super::types::FormSubmission;

/// Forwards submissions through a shared mail relay.
#[derive(Clone)]
pub struct TalentDispatcher {
    relay: Arc<dyn MailRelay>,
    sender: String,
    recipient: String,
}

impl TalentDispatcher {
    /// Create a dispatcher sending from `sender` to `recipient`.
    #[must_use]
    pub fn new(
        relay: Arc<dyn MailRelay>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            relay,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    /// Subject line for a submission.
    #[must_use]
    pub fn subject_for(submission: &FormSubmission) -> String {
        format!("New Talent Application - {}", submission.full_name())
    }

    /// Assemble the outgoing message without sending it.
    #[must_use]
    pub fn compose(
        &self,
        submission: &FormSubmission,
        attachment: Option<MailAttachment>,
    ) -> OutgoingMail {
        OutgoingMail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: Self::subject_for(submission),
            html: render_email(submission),
            attachments: attachment.into_iter().collect(),
        }
    }

    /// Send one notification. A failure is returned as-is, never retried.
    ///
    /// # Errors
    ///
    /// Returns the relay's error if delivery fails.
    pub async fn dispatch(
        &self,
        submission: &FormSubmission,
        attachment: Option<MailAttachment>,
    ) -> Result<(), EmailError> {
        let mail = self.compose(submission, attachment);
        let attachments = mail.attachments.len();

        self.relay.send(mail).await?;

        tracing::info!(
            applicant = %submission.full_name(),
            attachments,
            "Talent application dispatched"
        );
        Ok(())
    }
}
