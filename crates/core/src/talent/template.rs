//! HTML body of the application notification.
//!
//! Field values are interpolated verbatim. Nothing is HTML-escaped, so markup
//! typed into the form reaches the admin inbox as markup.

use super::types::FormSubmission;
use crate::upload::StoredUpload;

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background-color: #7A35C1; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }
        .content { background-color: #f9f9f9; padding: 20px; border: 1px solid #ddd; border-radius: 0 0 5px 5px; }
        .section { margin-bottom: 20px; }
        .label { font-weight: bold; color: #7A35C1; }
        .footer { text-align: center; margin-top: 20px; font-size: 12px; color: #666; }";

const BRAND: &str = "Maxtron Innovation";

/// Render the notification email for one submission.
#[must_use]
pub fn render_email(submission: &FormSubmission) -> String {
    let s = submission;
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>New Talent Application</h1>
            <p>{BRAND}</p>
        </div>
        <div class="content">
            <div class="section">
                <h2>Personal Information</h2>
                <p><span class="label">Name:</span> {first} {last}</p>
                <p><span class="label">Email:</span> {email}</p>
                <p><span class="label">Phone:</span> {phone}</p>
            </div>

            <div class="section">
                <h2>Professional Details</h2>
                <p><span class="label">Area of Interest:</span> {area}</p>
                <p><span class="label">Experience Level:</span> {level}</p>
            </div>

            <div class="section">
                <h2>Location</h2>
                <p><span class="label">City:</span> {city}</p>
                <p><span class="label">State:</span> {state}</p>
                <p><span class="label">Country:</span> {country}</p>
            </div>

            <div class="section">
                <h2>Communication Preferences</h2>
                <p><span class="label">Email Consent:</span> {consent_email}</p>
                <p><span class="label">SMS Consent:</span> {consent_sms}</p>
            </div>

            <div class="section">
                <h2>Resume</h2>
                {resume}
            </div>
        </div>
        <div class="footer">
            <p>This is an automated message from {BRAND}'s Talent Portal</p>
        </div>
    </div>
</body>
</html>
"#,
        first = s.first_name,
        last = s.last_name,
        email = s.email,
        phone = s.phone,
        area = s.area_of_interest,
        level = s.experience_level,
        city = s.city,
        state = s.state,
        country = s.country,
        consent_email = yes_no(s.consent_email),
        consent_sms = yes_no(s.consent_sms),
        resume = resume_section(s.resume.as_ref()),
    )
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn resume_section(resume: Option<&StoredUpload>) -> String {
    match resume {
        Some(file) => format!(
            r#"<p><span class="label">File:</span> {} ({})</p>
                <p>A resume has been attached to this email.</p>"#,
            file.original_name,
            format_size(file.size_bytes)
        ),
        None => "<p>No resume was provided.</p>".to_string(),
    }
}

/// `1.5 MB`, `12 KB`, `80 bytes`.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        let tenths = bytes * 10 / MB;
        format!("{}.{} MB", tenths / 10, tenths % 10)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}
