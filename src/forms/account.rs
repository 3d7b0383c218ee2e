//! Profile, address and payment card forms of the settings pages.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::account::{Address, NewPaymentCard, UpdateProfile};
use crate::forms::{FormError, non_blank, validate_phone};

/// Minimum age accepted on the profile page.
pub const MIN_AGE: u32 = 18;

fn too_short(message: &'static str) -> ValidationError {
    ValidationError::new("length").with_message(Cow::Borrowed(message))
}

fn optional_min(value: &str, min: usize, message: &'static str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() >= min {
        Ok(())
    } else {
        Err(too_short(message))
    }
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    optional_min(value, 2, "Name must be at least 2 characters")
}

fn validate_surname(value: &str) -> Result<(), ValidationError> {
    optional_min(value, 2, "Surname must be at least 2 characters")
}

fn validate_city(value: &str) -> Result<(), ValidationError> {
    optional_min(value, 2, "City must be at least 2 characters")
}

fn validate_zip(value: &str) -> Result<(), ValidationError> {
    optional_min(value, 3, "Zip code must be at least 3 characters")
}

/// Full years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn validate_birth_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let Some(birth) = parse_birth_date(value) else {
        return Err(ValidationError::new("date").with_message(Cow::Borrowed("Invalid date format")));
    };
    if age_on(birth, Utc::now().date_naive()) < MIN_AGE as i32 {
        return Err(ValidationError::new("age")
            .with_message(Cow::Borrowed("You must be at least 18 years old")));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Editable profile fields. Every field may be left empty.
pub struct ProfileForm {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_surname"))]
    pub surname: String,
    #[serde(default)]
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[serde(default)]
    pub country_id: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_city"))]
    pub city: String,
    #[serde(default)]
    #[validate(custom(function = "validate_zip"))]
    pub zip_code: String,
}

impl TryFrom<ProfileForm> for UpdateProfile {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let birth_date = match non_blank(&form.birth_date) {
            Some(raw) => Some(parse_birth_date(&raw).ok_or(FormError::InvalidDate)?),
            None => None,
        };
        Ok(Self {
            name: non_blank(&form.name),
            surname: non_blank(&form.surname),
            country_id: non_blank(&form.country_id),
            location_id: non_blank(&form.location_id),
            city: non_blank(&form.city),
            zip_code: non_blank(&form.zip_code),
            phone_number: non_blank(&form.phone_number),
            birth_date,
        })
    }
}

fn validate_required_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Phone number is required")));
    }
    validate_phone(value.trim())
}

#[derive(Debug, Deserialize, Validate)]
/// New delivery address. Field names follow the address dialog inputs.
pub struct AddressForm {
    #[serde(default, rename = "first-name")]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default, rename = "last-name")]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default, rename = "street-address")]
    #[validate(length(min = 1, message = "Street address is required"))]
    pub street_address: String,
    #[serde(default, rename = "street-address-second")]
    pub street_address_second: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Zip code is required"))]
    pub zip: String,
    #[serde(default, rename = "phone-number")]
    #[validate(custom(function = "validate_required_phone"))]
    pub phone_number: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
}

impl TryFrom<AddressForm> for Address {
    type Error = FormError;

    fn try_from(form: AddressForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            id: None,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            street_address: form.street_address.trim().to_string(),
            street_address_second: non_blank(&form.street_address_second),
            city: form.city.trim().to_string(),
            zip_code: form.zip.trim().to_string(),
            phone_number: form.phone_number.trim().to_string(),
            country: non_blank(&form.country),
            state: non_blank(&form.state),
        })
    }
}

/// Strips the input mask (`____-____-____-____`) from a card number.
fn card_digits(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '_'))
        .collect()
}

fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let digits = card_digits(value);
    if digits.len() == 16 && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("card_number")
            .with_message(Cow::Borrowed("Card number must be 16 digits")))
    }
}

/// Normalizes `MM-YY` or `MM/YY` to `MM/YY`.
fn normalize_expiration(value: &str) -> Option<String> {
    let value = value.trim();
    let (month, year) = value.split_once(['-', '/'])?;
    if month.len() != 2 || year.len() != 2 {
        return None;
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month_number: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month_number) {
        return None;
    }
    Some(format!("{month}/{year}"))
}

fn validate_expiration(value: &str) -> Result<(), ValidationError> {
    normalize_expiration(value).map(|_| ()).ok_or_else(|| {
        ValidationError::new("expiration_date")
            .with_message(Cow::Borrowed("Expiration date must be MM-YY"))
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct PaymentCardForm {
    #[serde(default, rename = "card-number")]
    #[validate(custom(function = "validate_card_number"))]
    pub card_number: String,
    #[serde(default, rename = "full-name")]
    #[validate(length(min = 1, message = "Card holder name is required"))]
    pub full_name: String,
    #[serde(default, rename = "expiration-date")]
    #[validate(custom(function = "validate_expiration"))]
    pub expiration_date: String,
}

impl TryFrom<PaymentCardForm> for NewPaymentCard {
    type Error = FormError;

    fn try_from(form: PaymentCardForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let expiration_date = normalize_expiration(&form.expiration_date)
            .ok_or_else(|| FormError::InvalidValue("expiration date".to_string()))?;
        Ok(Self {
            card_number: card_digits(&form.card_number),
            full_name: form.full_name.trim().to_string(),
            expiration_date,
        })
    }
}
