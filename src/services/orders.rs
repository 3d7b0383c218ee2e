//! Order history and checkout.

use crate::api::{AccountReader, CartReader, OrderReader, OrderWriter};
use crate::domain::order::CheckoutRequest;
use crate::domain::session::SessionTokens;
use crate::domain::types::OrderId;
use crate::dto::orders::{CheckoutPageData, OrderPageData, OrdersPageData};
use crate::forms::cart::CheckoutForm;
use crate::services::{ServiceResult, ensure_signed_in};

pub async fn list_orders<R>(repo: &R, session: &SessionTokens) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_signed_in(session)?;

    let orders = repo.list_orders().await.map_err(|err| {
        log::error!("Failed to list orders: {err}");
        err
    })?;
    Ok(OrdersPageData { orders })
}

pub async fn show_order<R>(
    repo: &R,
    session: &SessionTokens,
    order_id: &str,
) -> ServiceResult<OrderPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_signed_in(session)?;
    let order_id = OrderId::new(order_id)?;

    let order = repo.get_order(&order_id).await.map_err(|err| {
        log::error!("Failed to load order {order_id}: {err}");
        err
    })?;
    Ok(OrderPageData {
        order_id: order_id.into_inner(),
        order,
    })
}

/// Loads the checkout summary with the promo code applied, plus the saved
/// addresses and cards to choose from.
pub async fn load_checkout<R>(
    repo: &R,
    session: &SessionTokens,
    form: &CheckoutForm,
) -> ServiceResult<CheckoutPageData>
where
    R: CartReader + AccountReader + ?Sized,
{
    ensure_signed_in(session)?;
    let promo_code = form.promo_code();

    let cart = repo
        .get_total_price(promo_code.clone())
        .await
        .map_err(|err| {
            log::error!("Failed to load checkout totals: {err}");
            err
        })?;
    let addresses = repo.list_addresses().await.map_err(|err| {
        log::error!("Failed to list addresses for checkout: {err}");
        err
    })?;
    let cards = repo.list_payment_cards().await.map_err(|err| {
        log::error!("Failed to list payment cards for checkout: {err}");
        err
    })?;
    let countries = repo.list_countries().await.unwrap_or_else(|err| {
        log::warn!("Failed to load countries: {err}");
        Vec::new()
    });

    Ok(CheckoutPageData {
        cart,
        addresses,
        cards,
        countries,
        promo_code,
    })
}

pub async fn checkout<R>(repo: &R, session: &SessionTokens, form: CheckoutForm) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    ensure_signed_in(session)?;
    let request = CheckoutRequest::try_from(form)?;

    repo.checkout(&request).await.map_err(|err| {
        log::error!("Failed to check out: {err}");
        err
    })?;
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockBackend;
    use crate::domain::cart::Cart;
    use crate::services::ServiceError;

    fn signed_in() -> SessionTokens {
        SessionTokens {
            private_token: Some("private".to_string()),
            ..SessionTokens::default()
        }
    }

    fn checkout_form(promocode: &str) -> CheckoutForm {
        CheckoutForm {
            card_id: "3".to_string(),
            address_id: "9".to_string(),
            promocode: promocode.to_string(),
        }
    }

    #[actix_web::test]
    async fn checkout_page_applies_promo_code() {
        let mut repo = MockBackend::new();
        repo.expect_get_total_price()
            .withf(|promo_code| promo_code.as_deref() == Some("SPRING"))
            .times(1)
            .returning(|_| Ok(Cart::default()));
        repo.expect_list_addresses().returning(|| Ok(vec![]));
        repo.expect_list_payment_cards().returning(|| Ok(vec![]));
        repo.expect_list_countries().returning(|| Ok(vec![]));

        let data = load_checkout(&repo, &signed_in(), &checkout_form("SPRING"))
            .await
            .unwrap();
        assert_eq!(data.promo_code.as_deref(), Some("SPRING"));
    }

    #[actix_web::test]
    async fn rejected_checkout_surfaces_message() {
        let mut repo = MockBackend::new();
        repo.expect_checkout()
            .withf(|request| request.bank_card_id == "3" && request.promo_code_id.is_none())
            .times(1)
            .returning(|_| {
                Err(ApiError::Rejected {
                    code: Some(200),
                    message: Some("Card declined".to_string()),
                })
            });

        let result = checkout(&repo, &signed_in(), checkout_form("")).await;
        assert!(matches!(
            result,
            Err(ServiceError::Rejected(message)) if message == "Card declined"
        ));
    }

    #[actix_web::test]
    async fn missing_order_is_not_found() {
        let mut repo = MockBackend::new();
        repo.expect_get_order()
            .withf(|order_id| order_id.as_str() == "A-17")
            .returning(|_| Err(ApiError::Status(404)));

        let result = show_order(&repo, &signed_in(), "A-17").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn orders_require_sign_in() {
        let mut repo = MockBackend::new();
        repo.expect_list_orders().times(0);

        let result = list_orders(&repo, &SessionTokens::default()).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
