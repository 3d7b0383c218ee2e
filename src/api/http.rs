//! `reqwest` implementation of the backend gateway traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::api::envelope::{Envelope, mutation_outcome};
use crate::api::errors::{ApiError, ApiResult};
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

/// Default backend request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token";

/// Backend client. Clones share the connection pool; [`HttpBackend::with_token`]
/// binds a clone to one visitor's session token.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavouriteBody<'a> {
    variation_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalPriceQuery<'a> {
    promo_code_id: &'a str,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
            token: None,
        })
    }

    /// Returns a clone that sends `token` with every request.
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            token: token.map(str::to_string),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }

    /// Sends the request and decodes the envelope. 4xx answers become
    /// [`ApiError::Rejected`] with the backend message; 401, 404 and 5xx are
    /// mapped by status alone.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<(StatusCode, Envelope<T>)> {
        let response = request.send().await?;
        let status = response.status();

        if let Some(err) = status_error(status) {
            return Err(err);
        }

        let body = response.bytes().await?;
        let envelope = if body.is_empty() {
            Envelope::default()
        } else {
            match serde_json::from_slice::<Envelope<T>>(&body) {
                Ok(envelope) => envelope,
                Err(err) if status.is_success() => return Err(err.into()),
                Err(_) => return Err(ApiError::Status(status.as_u16())),
            }
        };

        if !status.is_success() {
            return Err(ApiError::Rejected {
                code: envelope.result.code.or(Some(status.as_u16())),
                message: envelope.result.error_msg,
            });
        }
        Ok((status, envelope))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let (_, envelope) = self.send::<T>(request).await?;
        envelope.into_data()
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<StatusCode> {
        let (status, envelope) = self.send::<IgnoredAny>(request).await?;
        envelope.into_checked()?;
        Ok(status)
    }
}

/// Statuses that fail regardless of the body.
fn status_error(status: StatusCode) -> Option<ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        Some(ApiError::Unauthorized)
    } else if status == StatusCode::NOT_FOUND || status.is_server_error() {
        Some(ApiError::Status(status.as_u16()))
    } else {
        None
    }
}

#[async_trait]
impl CatalogReader for HttpBackend {
    async fn list_products(&self, query: &str) -> ApiResult<ProductPage> {
        let path = if query.is_empty() {
            "/products".to_string()
        } else {
            format!("/products?{query}")
        };
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn list_categories(&self) -> ApiResult<Vec<MainCategory>> {
        self.fetch(self.request(Method::GET, "/categories/hierarchy")).await
    }
}

#[async_trait]
impl CartReader for HttpBackend {
    async fn get_cart(&self) -> ApiResult<Cart> {
        self.fetch(self.request(Method::GET, "/user/cart")).await
    }

    async fn get_total_price(&self, promo_code: Option<String>) -> ApiResult<Cart> {
        let mut request = self.request(Method::GET, "/user/total-price");
        if let Some(promo_code_id) = promo_code.as_deref() {
            request = request.query(&TotalPriceQuery { promo_code_id });
        }
        self.fetch(request).await
    }
}

#[async_trait]
impl CartWriter for HttpBackend {
    async fn apply_cart_mutation(&self, mutation: &CartMutation) -> ApiResult<MutationOutcome> {
        let request = self
            .request(Method::POST, "/user/cart")
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(mutation.to_form());
        mutation_outcome(self.execute(request).await)
    }
}

#[async_trait]
impl FavouriteReader for HttpBackend {
    async fn list_favourites(&self) -> ApiResult<Vec<Product>> {
        self.fetch(self.request(Method::GET, "/user/favourites")).await
    }
}

#[async_trait]
impl FavouriteWriter for HttpBackend {
    async fn toggle_favourite(&self, variation_code: &VariationCode) -> ApiResult<MutationOutcome> {
        let request = self
            .request(Method::POST, "/user/favourites")
            .json(&FavouriteBody {
                variation_code: variation_code.as_str(),
            });
        mutation_outcome(self.execute(request).await)
    }
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn sign_in(&self, payload: &SignInPayload) -> ApiResult<AuthTokens> {
        self.fetch(self.request(Method::POST, "/security/sign-in").json(payload))
            .await
    }

    async fn sign_up(&self, payload: &SignUpPayload) -> ApiResult<SignUpStatus> {
        let status = self
            .execute(self.request(Method::POST, "/security/signup").json(payload))
            .await?;
        match status {
            StatusCode::ACCEPTED => Ok(SignUpStatus::RestoreOrNew),
            _ => Ok(SignUpStatus::OtpSent),
        }
    }

    async fn confirm_otp(&self, payload: &OtpPayload) -> ApiResult<AuthTokens> {
        self.fetch(self.request(Method::POST, "/security/confirm-otp").json(payload))
            .await
    }

    async fn insert_choice(&self, choice: AccountChoice) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/security/insert-choice").json(&choice))
            .await?;
        Ok(())
    }

    async fn forgot_password(&self, payload: &ForgotPasswordPayload) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/security/forgot-password").json(payload))
            .await?;
        Ok(())
    }

    async fn verify_reset_otp(&self, payload: &OtpPayload) -> ApiResult<()> {
        self.execute(
            self.request(Method::POST, "/security/forgot-password/verify-otp")
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn reset_password(&self, payload: &NewPasswordPayload) -> ApiResult<()> {
        self.execute(
            self.request(Method::POST, "/security/forgot-password/reset")
                .json(payload),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountReader for HttpBackend {
    async fn get_profile(&self) -> ApiResult<Profile> {
        self.fetch(self.request(Method::GET, "/user/info")).await
    }

    async fn list_countries(&self) -> ApiResult<Vec<Country>> {
        self.fetch(self.request(Method::GET, "/user/countries_and_regions"))
            .await
    }

    async fn list_addresses(&self) -> ApiResult<Vec<Address>> {
        self.fetch(self.request(Method::GET, "/user/addresses")).await
    }

    async fn list_payment_cards(&self) -> ApiResult<Vec<PaymentCard>> {
        self.fetch(self.request(Method::GET, "/user/bank-cards")).await
    }
}

#[async_trait]
impl AccountWriter for HttpBackend {
    async fn update_profile(&self, update: &UpdateProfile) -> ApiResult<()> {
        self.execute(self.request(Method::PUT, "/user/profile").json(update))
            .await?;
        Ok(())
    }

    async fn add_address(&self, address: &Address) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/user/addresses").json(address))
            .await?;
        Ok(())
    }

    async fn add_payment_card(&self, card: &NewPaymentCard) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/user/bank-cards").json(card))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderReader for HttpBackend {
    async fn list_orders(&self) -> ApiResult<Vec<OrderSummary>> {
        self.fetch(self.request(Method::GET, "/user/orders")).await
    }

    async fn get_order(&self, order_id: &OrderId) -> ApiResult<OrderDetails> {
        let path = format!("/user/orders/{order_id}");
        self.fetch(self.request(Method::GET, &path)).await
    }
}

#[async_trait]
impl OrderWriter for HttpBackend {
    async fn checkout(&self, request: &CheckoutRequest) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/user/checkout").json(request))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewWriter for HttpBackend {
    async fn add_review(&self, review: &NewReview) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/user/reviews").json(review))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_bound_per_clone() {
        let backend = HttpBackend::new("http://backend.local", DEFAULT_TIMEOUT).unwrap();
        let visitor = backend.with_token(Some("abc"));
        assert_eq!(backend.token(), None);
        assert_eq!(visitor.token(), Some("abc"));

        let request = visitor
            .request(Method::GET, "/user/orders")
            .build()
            .unwrap();
        assert_eq!(request.headers()[TOKEN_HEADER], "abc");
        assert_eq!(request.url().as_str(), "http://backend.local/user/orders");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let backend = HttpBackend::new("http://backend.local/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            backend.url("/user/orders"),
            "http://backend.local/api/user/orders"
        );
    }

    #[test]
    fn status_alone_decides_auth_missing_and_server_errors() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED),
            Some(ApiError::Unauthorized)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND),
            Some(ApiError::Status(404))
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY),
            Some(ApiError::Status(502))
        ));
        assert!(status_error(StatusCode::BAD_REQUEST).is_none());
        assert!(status_error(StatusCode::ACCEPTED).is_none());
    }
}
