//! Settings pages: profile, delivery addresses and payment cards.

use crate::api::{AccountReader, AccountWriter};
use crate::domain::account::{Address, NewPaymentCard, UpdateProfile};
use crate::domain::session::SessionTokens;
use crate::dto::account::{AddressesPageData, PaymentPageData, ProfilePageData};
use crate::forms::account::{AddressForm, PaymentCardForm, ProfileForm};
use crate::services::{ServiceResult, ensure_signed_in};

pub async fn load_profile<R>(repo: &R, session: &SessionTokens) -> ServiceResult<ProfilePageData>
where
    R: AccountReader + ?Sized,
{
    ensure_signed_in(session)?;

    let profile = repo.get_profile().await.map_err(|err| {
        log::error!("Failed to load profile: {err}");
        err
    })?;
    let countries = repo.list_countries().await.unwrap_or_else(|err| {
        log::warn!("Failed to load countries: {err}");
        Vec::new()
    });

    Ok(ProfilePageData { profile, countries })
}

/// Sends only the fields the visitor filled in.
pub async fn update_profile<R>(
    repo: &R,
    session: &SessionTokens,
    form: ProfileForm,
) -> ServiceResult<()>
where
    R: AccountWriter + ?Sized,
{
    ensure_signed_in(session)?;
    let update = UpdateProfile::try_from(form)?;

    repo.update_profile(&update).await.map_err(|err| {
        log::error!("Failed to update profile: {err}");
        err
    })?;
    Ok(())
}

pub async fn load_addresses<R>(
    repo: &R,
    session: &SessionTokens,
) -> ServiceResult<AddressesPageData>
where
    R: AccountReader + ?Sized,
{
    ensure_signed_in(session)?;

    let addresses = repo.list_addresses().await.map_err(|err| {
        log::error!("Failed to list addresses: {err}");
        err
    })?;
    let countries = repo.list_countries().await.unwrap_or_else(|err| {
        log::warn!("Failed to load countries: {err}");
        Vec::new()
    });

    Ok(AddressesPageData {
        addresses,
        countries,
    })
}

pub async fn add_address<R>(
    repo: &R,
    session: &SessionTokens,
    form: AddressForm,
) -> ServiceResult<()>
where
    R: AccountWriter + ?Sized,
{
    ensure_signed_in(session)?;
    let address = Address::try_from(form)?;

    repo.add_address(&address).await.map_err(|err| {
        log::error!("Failed to add address: {err}");
        err
    })?;
    Ok(())
}

pub async fn load_payment_cards<R>(
    repo: &R,
    session: &SessionTokens,
) -> ServiceResult<PaymentPageData>
where
    R: AccountReader + ?Sized,
{
    ensure_signed_in(session)?;

    let cards = repo.list_payment_cards().await.map_err(|err| {
        log::error!("Failed to list payment cards: {err}");
        err
    })?;
    Ok(PaymentPageData { cards })
}

pub async fn add_payment_card<R>(
    repo: &R,
    session: &SessionTokens,
    form: PaymentCardForm,
) -> ServiceResult<()>
where
    R: AccountWriter + ?Sized,
{
    ensure_signed_in(session)?;
    let card = NewPaymentCard::try_from(form)?;

    repo.add_payment_card(&card).await.map_err(|err| {
        log::error!("Failed to add payment card: {err}");
        err
    })?;
    Ok(())
}
