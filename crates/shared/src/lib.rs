//! Shared configuration, errors, and mail relay for the talent portal.
//!
//! This crate provides the pieces every other crate leans on:
//! - Layered configuration (`AppConfig`)
//! - The boundary error taxonomy (`AppError`)
//! - The outbound mail relay (`MailRelay`, `SmtpRelay`)

pub mod config;
pub mod email;
pub mod error;

pub use config::{AppConfig, EmailConfig, ServerConfig, UploadConfig};
pub use email::{EmailError, MailAttachment, MailRelay, OutgoingMail, SmtpRelay};
pub use error::AppError;
