use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "birth_date")]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Profile changes forwarded to `PUT /user/profile`. Empty inputs are sent
/// as `None`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub country_id: Option<String>,
    pub location_id: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    #[serde(rename = "birth_date")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    #[serde(default)]
    pub street_address_second: Option<String>,
    pub city: String,
    pub zip_code: String,
    pub phone_number: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub id: u32,
    /// Last four digits, as masked by the backend.
    pub card_number: String,
    pub full_name: String,
    pub expiration_date: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentCard {
    /// Sixteen digits, separators stripped.
    pub card_number: String,
    pub full_name: String,
    /// Normalized to `MM/YY`.
    pub expiration_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub regions: Vec<Region>,
}
