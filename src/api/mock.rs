//! Mock gateway implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::ApiResult;
use crate::api::{
    AccountReader, AccountWriter, AuthApi, CartReader, CartWriter, CatalogReader,
    FavouriteReader, FavouriteWriter, OrderReader, OrderWriter, ReviewWriter,
};
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

mock! {
    pub Backend {}

    #[async_trait]
    impl CatalogReader for Backend {
        async fn list_products(&self, query: &str) -> ApiResult<ProductPage>;
        async fn list_categories(&self) -> ApiResult<Vec<MainCategory>>;
    }

    #[async_trait]
    impl CartReader for Backend {
        async fn get_cart(&self) -> ApiResult<Cart>;
        async fn get_total_price(&self, promo_code: Option<String>) -> ApiResult<Cart>;
    }

    #[async_trait]
    impl CartWriter for Backend {
        async fn apply_cart_mutation(
            &self,
            mutation: &CartMutation,
        ) -> ApiResult<MutationOutcome>;
    }

    #[async_trait]
    impl FavouriteReader for Backend {
        async fn list_favourites(&self) -> ApiResult<Vec<Product>>;
    }

    #[async_trait]
    impl FavouriteWriter for Backend {
        async fn toggle_favourite(
            &self,
            variation_code: &VariationCode,
        ) -> ApiResult<MutationOutcome>;
    }

    #[async_trait]
    impl AuthApi for Backend {
        async fn sign_in(&self, payload: &SignInPayload) -> ApiResult<AuthTokens>;
        async fn sign_up(&self, payload: &SignUpPayload) -> ApiResult<SignUpStatus>;
        async fn confirm_otp(&self, payload: &OtpPayload) -> ApiResult<AuthTokens>;
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
    impl AccountReader for Backend {
        async fn get_profile(&self) -> ApiResult<Profile>;
        async fn list_countries(&self) -> ApiResult<Vec<Country>>;
        async fn list_addresses(&self) -> ApiResult<Vec<Address>>;
        async fn list_payment_cards(&self) -> ApiResult<Vec<PaymentCard>>;
    }

    #[async_trait]
    impl AccountWriter for Backend {
        async fn update_profile(&self, update: &UpdateProfile) -> ApiResult<()>;
        async fn add_address(&self, address: &Address) -> ApiResult<()>;
        async fn add_payment_card(&self, card: &NewPaymentCard) -> ApiResult<()>;
    }

    #[async_trait]
    impl OrderReader for Backend {
        async fn list_orders(&self) -> ApiResult<Vec<OrderSummary>>;
        async fn get_order(&self, order_id: &OrderId) -> ApiResult<OrderDetails>;
    }

    #[async_trait]
    impl OrderWriter for Backend {
        async fn checkout(&self, request: &CheckoutRequest) -> ApiResult<()>;
    }

    #[async_trait]
    impl ReviewWriter for Backend {
        async fn add_review(&self, review: &NewReview) -> ApiResult<()>;
    }
}
