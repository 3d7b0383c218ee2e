use serde::Serialize;

use crate::domain::account::{Address, Country, PaymentCard, Profile};

#[derive(Debug, Serialize)]
pub struct ProfilePageData {
    pub profile: Profile,
    pub countries: Vec<Country>,
}

#[derive(Debug, Serialize)]
pub struct AddressesPageData {
    pub addresses: Vec<Address>,
    pub countries: Vec<Country>,
}

#[derive(Debug, Serialize)]
pub struct PaymentPageData {
    pub cards: Vec<PaymentCard>,
}
