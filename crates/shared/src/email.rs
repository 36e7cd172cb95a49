//! Mail relay for outbound notifications.
//!
//! Uses `lettre` for SMTP transport. The transport is built once at startup
//! and shared by every request through the [`MailRelay`] trait.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A file carried along with an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    /// Filename shown to the recipient.
    pub filename: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// One outbound HTML message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender mailbox.
    pub from: String,
    /// Recipient mailbox.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Zero or more attachments.
    pub attachments: Vec<MailAttachment>,
}

/// Anything that can deliver an [`OutgoingMail`].
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Submit one message. No retry is attempted.
    async fn send(&self, mail: OutgoingMail) -> Result<(), EmailError>;
}

/// SMTP-backed relay.
#[derive(Clone)]
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    /// Creates the relay and its SMTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host cannot be used for TLS.
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        Ok(Self {
            transport: create_transport(config)?,
        })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, mail: OutgoingMail) -> Result<(), EmailError> {
        let message = build_message(&mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        tracing::debug!(to = %mail.to, subject = %mail.subject, "Email relayed");
        Ok(())
    }
}

/// Creates an SMTP transport.
///
/// Port 465 uses implicit TLS, any other port upgrades with STARTTLS.
fn create_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let host = config.smtp_host.as_str();
    let builder = match (config.smtp_tls, config.smtp_port) {
        (false, _) => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        (true, 465) => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| EmailError::SendError(e.to_string()))?,
        (true, _) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| EmailError::SendError(e.to_string()))?,
    };

    let mut builder = builder.port(config.smtp_port);
    if !config.smtp_username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));
    }

    Ok(builder.build())
}

/// Builds a `multipart/mixed` message: the HTML body followed by one part per
/// attachment.
///
/// # Errors
///
/// Returns an error if an address or content type cannot be parsed.
pub fn build_message(mail: &OutgoingMail) -> Result<Message, EmailError> {
    let mut body = MultiPart::mixed().singlepart(SinglePart::html(mail.html.clone()));
    for attachment in &mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| EmailError::BuildError(e.to_string()))?;
        body = body.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject.clone())
        .multipart(body)
        .map_err(|e| EmailError::BuildError(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|e| EmailError::InvalidAddress(format!("{address}: {e}")))
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
