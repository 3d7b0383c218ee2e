//! Gateway to the backend REST API.
//!
//! Services depend on the narrow reader/writer traits below, never on the
//! HTTP client directly. [`http::HttpBackend`] implements all of them; the
//! `test-mocks` feature provides a mockall double in [`mock`].
//!
//! The visitor's session token travels with the gateway value itself, see
//! [`http::HttpBackend::with_token`].

use async_trait::async_trait;

use crate::domain::account::{Address, Country, NewPaymentCard, PaymentCard, Profile, UpdateProfile};
use crate::domain::cart::{Cart, CartMutation};
use crate::domain::catalog::{MainCategory, Product, ProductPage};
use crate::domain::mutation::MutationOutcome;
use crate::domain::order::{CheckoutRequest, OrderDetails, OrderSummary};
use crate::domain::review::NewReview;
use crate::domain::session::{
    AccountChoice, AuthTokens, ForgotPasswordPayload, NewPasswordPayload, OtpPayload,
    SignInPayload, SignUpPayload, SignUpStatus,
};
use crate::domain::types::{OrderId, VariationCode};

pub mod envelope;
pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use errors::{ApiError, ApiResult};

#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Lists products for a canonical filter query string.
    async fn list_products(&self, query: &str) -> ApiResult<ProductPage>;
    async fn list_categories(&self) -> ApiResult<Vec<MainCategory>>;
}

#[async_trait]
pub trait CartReader: Send + Sync {
    async fn get_cart(&self) -> ApiResult<Cart>;
    /// Cart totals with an optional promo code applied.
    async fn get_total_price(&self, promo_code: Option<String>) -> ApiResult<Cart>;
}

#[async_trait]
pub trait CartWriter: Send + Sync {
    /// Sends one cart mutation. Backend rejections are reported as a failed
    /// outcome, transport failures as `Err`.
    async fn apply_cart_mutation(
        &self,
        mutation: &CartMutation,
    ) -> ApiResult<MutationOutcome>;
}

#[async_trait]
pub trait FavouriteReader: Send + Sync {
    async fn list_favourites(&self) -> ApiResult<Vec<Product>>;
}

#[async_trait]
pub trait FavouriteWriter: Send + Sync {
    async fn toggle_favourite(
        &self,
        variation_code: &VariationCode,
    ) -> ApiResult<MutationOutcome>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, payload: &SignInPayload) -> ApiResult<AuthTokens>;
    async fn sign_up(&self, payload: &SignUpPayload)
    -> ApiResult<SignUpStatus>;
    async fn confirm_otp(&self, payload: &OtpPayload)
    -> ApiResult<AuthTokens>;
    async fn insert_choice(&self, choice: AccountChoice) -> ApiResult<()>;
    async fn forgot_password(
        &self,
        payload: &ForgotPasswordPayload,
    ) -> ApiResult<()>;
    async fn verify_reset_otp(&self, payload: &OtpPayload) -> ApiResult<()>;
    async fn reset_password(
        &self,
        payload: &NewPasswordPayload,
    ) -> ApiResult<()>;
}

#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn get_profile(&self) -> ApiResult<Profile>;
    async fn list_countries(&self) -> ApiResult<Vec<Country>>;
    async fn list_addresses(&self) -> ApiResult<Vec<Address>>;
    async fn list_payment_cards(&self) -> ApiResult<Vec<PaymentCard>>;
}

#[async_trait]
pub trait AccountWriter: Send + Sync {
    async fn update_profile(&self, update: &UpdateProfile) -> ApiResult<()>;
    async fn add_address(&self, address: &Address) -> ApiResult<()>;
    async fn add_payment_card(&self, card: &NewPaymentCard) -> ApiResult<()>;
}

#[async_trait]
pub trait OrderReader: Send + Sync {
    async fn list_orders(&self) -> ApiResult<Vec<OrderSummary>>;
    async fn get_order(&self, order_id: &OrderId) -> ApiResult<OrderDetails>;
}

#[async_trait]
pub trait OrderWriter: Send + Sync {
    async fn checkout(&self, request: &CheckoutRequest) -> ApiResult<()>;
}

#[async_trait]
pub trait ReviewWriter: Send + Sync {
    async fn add_review(&self, review: &NewReview) -> ApiResult<()>;
}
