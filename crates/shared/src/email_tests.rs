use super::*;

fn sample_mail(attachments: Vec<MailAttachment>) -> OutgoingMail {
    OutgoingMail {
        from: "Talent Portal <careers@example.com>".to_string(),
        to: "hr@example.com".to_string(),
        subject: "New Talent Application - Ada Lovelace".to_string(),
        html: "<p>hello</p>".to_string(),
        attachments,
    }
}

fn formatted(message: &Message) -> String {
    String::from_utf8_lossy(&message.formatted()).into_owned()
}

#[test]
fn test_create_transport() {
    let config = EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_tls: false,
        smtp_username: "user".to_string(),
        smtp_password: "password".to_string(),
        from_email: "test@example.com".to_string(),
        ..EmailConfig::default()
    };

    assert!(SmtpRelay::from_config(&config).is_ok());
}

#[test]
fn test_create_transport_with_tls_defaults() {
    assert!(SmtpRelay::from_config(&EmailConfig::default()).is_ok());

    let starttls = EmailConfig {
        smtp_port: 587,
        ..EmailConfig::default()
    };
    assert!(SmtpRelay::from_config(&starttls).is_ok());
}

#[test]
fn test_build_message_without_attachment() {
    let message = build_message(&sample_mail(Vec::new())).expect("should build");
    let raw = formatted(&message);

    assert!(raw.contains("Subject: New Talent Application - Ada Lovelace"));
    assert!(raw.contains("To: hr@example.com"));
    assert!(raw.contains("text/html"));
    assert!(!raw.contains("Content-Disposition: attachment"));
}

#[test]
fn test_build_message_with_attachment() {
    let attachment = MailAttachment {
        filename: "cv.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        content: b"%PDF-1.4".to_vec(),
    };
    let message = build_message(&sample_mail(vec![attachment])).expect("should build");
    let raw = formatted(&message);

    assert_eq!(raw.matches("Content-Disposition: attachment").count(), 1);
    assert!(raw.contains("cv.pdf"));
    assert!(raw.contains("application/pdf"));
}

#[test]
fn test_build_message_invalid_address() {
    let mut mail = sample_mail(Vec::new());
    mail.to = "not an address".to_string();

    let err = build_message(&mail).unwrap_err();
    assert!(matches!(err, EmailError::InvalidAddress(_)));
}

#[test]
fn test_build_message_invalid_content_type() {
    let attachment = MailAttachment {
        filename: "cv.pdf".to_string(),
        content_type: "not a mime".to_string(),
        content: Vec::new(),
    };

    let err = build_message(&sample_mail(vec![attachment])).unwrap_err();
    assert!(matches!(err, EmailError::BuildError(_)));
}

#[test]
fn test_email_error_display() {
    assert_eq!(
        format!("{}", EmailError::BuildError("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::SendError("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
}
