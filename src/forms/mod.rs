//! Form definitions backing the storefront routes.
//!
//! Every form is a `serde` + `validator` struct mirroring the HTML field
//! names. Validation failures never reach the backend: handlers turn them
//! into [`FieldErrors`] and render them next to the offending inputs.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::domain::types::{TypeConstraintError, is_valid_phone};

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod review;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid one-time password")]
    InvalidOtp,

    #[error("invalid date")]
    InvalidDate,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidOtp => FormError::InvalidOtp,
            other => FormError::InvalidValue(other.to_string()),
        }
    }
}

impl FormError {
    /// Inline errors to render next to the form inputs.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            FormError::Validation(errors) => FieldErrors::from(errors),
            FormError::InvalidEmail => FieldErrors::single("email", EMAIL_FORMAT),
            FormError::InvalidOtp => FieldErrors::single("otp", OTP_LENGTH),
            FormError::InvalidDate => FieldErrors::single("birth_date", "Invalid date format"),
            other => FieldErrors::single("general", other.to_string()),
        }
    }
}

/// First validation message per field, keyed by the HTML input name.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), message.into());
        Self(errors)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message of the first field in input-name order.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                let first = errors.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some((field.to_string(), message))
            })
            .collect();
        Self(fields)
    }
}

const EMAIL_REQUIRED: &str = "Email must be entered.";
const EMAIL_FORMAT: &str = "Email address must be in the correct format.";
const OTP_LENGTH: &str = "The OTP must be exactly 6 digits.";
const OTP_DIGITS: &str = "The OTP must contain only numbers.";

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_email_field(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", EMAIL_REQUIRED));
    }
    if !value.validate_email() {
        return Err(invalid("email", EMAIL_FORMAT));
    }
    Ok(())
}

/// Checks the password rules in order and reports the first one broken.
fn password_rules(value: &str, required: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("required", required));
    }
    if value.chars().count() < 8 {
        return Err(invalid(
            "length",
            "Password must be at least 8 characters long.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            "uppercase",
            "Password must contain at least 1 uppercase letter.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(invalid(
            "lowercase",
            "Password must contain at least 1 lowercase letter.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("digit", "Password must contain at least 1 digit."));
    }
    if !value.chars().any(|c| "@$!%*?&".contains(c)) {
        return Err(invalid(
            "special",
            "Password must contain at least 1 special character. (@, $, !, %, *, ?, &)",
        ));
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    password_rules(value, "Password must be entered.")
}

fn validate_new_password(value: &str) -> Result<(), ValidationError> {
    password_rules(value, "New Password must be entered.")
}

fn validate_otp(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() != 6 {
        return Err(invalid("length", OTP_LENGTH));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("digits", OTP_DIGITS));
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_phone(value) {
        Ok(())
    } else {
        Err(invalid("phone", "Invalid phone number"))
    }
}

/// Turns blank inputs into `None` and trims the rest.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
