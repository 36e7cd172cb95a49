//! Talent application types.

use std::collections::HashMap;

use serde::Serialize;

use super::error::SubmissionError;
use crate::upload::StoredUpload;

/// Text fields every application must carry, in form order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "firstName",
    "lastName",
    "email",
    "phone",
    "areaOfInterest",
    "experienceLevel",
    "city",
    "state",
    "country",
];

/// Untyped text fields as they arrived in the multipart body.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    fields: HashMap<String, String>,
}

impl RawSubmission {
    /// Create an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field. A repeated name keeps the last value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (k, v) in iter {
            raw.insert(k, v);
        }
        raw
    }
}

/// One applicant's submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address, not validated.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Free-form category label.
    pub area_of_interest: String,
    /// Free-form category label.
    pub experience_level: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country.
    pub country: String,
    /// Applicant agreed to email contact.
    pub consent_email: bool,
    /// Applicant agreed to SMS contact.
    #[serde(rename = "consentSMS")]
    pub consent_sms: bool,
    /// Uploaded resume, if any.
    #[serde(skip)]
    pub resume: Option<StoredUpload>,
}

impl FormSubmission {
    /// Build a submission from raw form fields.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingFields`] naming every absent
    /// required field.
    pub fn from_raw(
        raw: &RawSubmission,
        resume: Option<StoredUpload>,
    ) -> Result<Self, SubmissionError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| raw.get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        let text = |name: &str| raw.get(name).unwrap_or_default().trim().to_string();

        Ok(Self {
            first_name: text("firstName"),
            last_name: text("lastName"),
            email: text("email"),
            phone: text("phone"),
            area_of_interest: text("areaOfInterest"),
            experience_level: text("experienceLevel"),
            city: text("city"),
            state: text("state"),
            country: text("country"),
            consent_email: parse_consent(raw.get("consentEmail")),
            consent_sms: parse_consent(raw.get("consentSMS")),
            resume,
        })
    }

    /// `First Last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Interpret a checkbox-style value. Absent means unchecked.
#[must_use]
pub fn parse_consent(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "y" | "1" | "checked"
        )
    })
}
