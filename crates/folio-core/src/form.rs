#![forbid(unsafe_code)]

//! Contact form validation.
//!
//! [`validate`] checks a raw [`FormFieldValue`] record and produces a
//! [`ValidationResult`]. Every rule runs on every call, so a single pass
//! reports all violations at once. Errors are always ordered name, email,
//! message regardless of which fields are populated.
//!
//! | Field | Rule | Message |
//! |-------|------|---------|
//! | name | empty after trim | `Name is required` |
//! | email | empty after trim | `Email is required` |
//! | email | not `local@domain.tld` | `Please enter a valid email address` |
//! | message | empty after trim | `Message is required` |
//! | subject | none | - |
//!
//! # Example
//!
//! ```
//! use folio_core::form::{validate, ErrorField, FormFieldValue};
//!
//! let result = validate(&FormFieldValue::new("Ana", "not-an-email", "", "hi"));
//! let errors = result.errors();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].field, ErrorField::Email);
//! ```

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Message for an empty name.
pub const NAME_REQUIRED: &str = "Name is required";
/// Message for an empty email.
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Message for a malformed email.
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
/// Message for an empty message body.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Raw contact form values as read from the page, before trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormFieldValue {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormFieldValue {
    /// Build a record from the four field values.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Copy of this record with every field trimmed.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: trim_field(&self.name).to_owned(),
            email: trim_field(&self.email).to_owned(),
            subject: trim_field(&self.subject).to_owned(),
            message: trim_field(&self.message).to_owned(),
        }
    }

    /// Raw value of `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    /// Whether every field is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| trim_field(self.get(*field)).is_empty())
    }
}

/// Every input control of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    /// All fields in page order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// The element id / form control name used by the page.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Parse a form control name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "subject" => Some(Self::Subject),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields that carry validation rules. Subject has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorField {
    Name,
    Email,
    Message,
}

impl From<ErrorField> for FormField {
    fn from(field: ErrorField) -> Self {
        match field {
            ErrorField::Name => Self::Name,
            ErrorField::Email => Self::Email,
            ErrorField::Message => Self::Message,
        }
    }
}

/// A single user-correctable validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldError {
    pub field: ErrorField,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: ErrorField, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Outcome of [`validate`].
///
/// `Invalid` always carries at least one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// All rules passed; carries the trimmed record.
    Valid(FormFieldValue),
    /// One or more rules failed, in name/email/message order.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Errors of an `Invalid` result; empty for `Valid`.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Whether `field` failed validation.
    #[must_use]
    pub fn has_error(&self, field: ErrorField) -> bool {
        self.errors().iter().any(|e| e.field == field)
    }
}

/// Validate a raw form record.
#[must_use]
pub fn validate(fields: &FormFieldValue) -> ValidationResult {
    let trimmed = fields.trimmed();
    let mut errors = Vec::new();

    if trimmed.name.is_empty() {
        errors.push(FieldError::new(ErrorField::Name, NAME_REQUIRED));
    }

    if trimmed.email.is_empty() {
        errors.push(FieldError::new(ErrorField::Email, EMAIL_REQUIRED));
    } else if !is_valid_email(&trimmed.email) {
        errors.push(FieldError::new(ErrorField::Email, EMAIL_INVALID));
    }

    if trimmed.message.is_empty() {
        errors.push(FieldError::new(ErrorField::Message, MESSAGE_REQUIRED));
    }

    if errors.is_empty() {
        ValidationResult::Valid(trimmed)
    } else {
        ValidationResult::Invalid(errors)
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").expect("email regex")
});

/// Strip leading and trailing blanks from a field value.
///
/// U+FEFF counts as blank, matching what browsers strip from form input.
#[must_use]
pub fn trim_field(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Whether `email` looks like `local@domain.tld`.
///
/// No whitespace and exactly one `@`; the domain needs a `.` with something
/// on either side of it.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
