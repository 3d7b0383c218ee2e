//! Cart page and cart mutations.

use crate::api::{ApiError, CartReader, CartWriter};
use crate::domain::cart::CartMutation;
use crate::domain::mutation::MutationOutcome;
use crate::domain::session::SessionTokens;
use crate::domain::types::CartItemId;
use crate::dto::cart::{ActionResponse, CartLine, CartPageData};
use crate::forms::cart::{CartActionForm, CartStep};
use crate::services::{ServiceError, ServiceResult, ensure_signed_in};
use crate::state::notification::Notification;
use crate::state::optimistic::{DispatchedMutation, OptimisticQuantity, shows_remove};

pub async fn load_cart<R>(repo: &R, session: &SessionTokens) -> ServiceResult<CartPageData>
where
    R: CartReader + ?Sized,
{
    ensure_signed_in(session)?;

    let cart = repo.get_cart().await.map_err(|err| {
        log::error!("Failed to load cart: {err}");
        err
    })?;

    let item_count = cart.item_count();
    let lines = cart
        .items
        .into_iter()
        .map(|item| CartLine {
            has_discount: item.has_visible_discount(),
            shows_remove: shows_remove(item.quantity),
            item,
        })
        .collect();

    Ok(CartPageData {
        lines,
        summary: cart.summary,
        item_count,
    })
}

/// Sends one dispatched mutation and settles `line` with its outcome.
/// Transport failures settle as a failed mutation.
pub async fn dispatch_quantity_change<R>(
    repo: &R,
    line: &mut OptimisticQuantity,
    dispatched: DispatchedMutation,
) -> Option<Notification>
where
    R: CartWriter + ?Sized,
{
    let outcome = match repo.apply_cart_mutation(&dispatched.mutation).await {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!(
                "Failed to send cart mutation for item {}: {err}",
                line.cart_item_id()
            );
            MutationOutcome::default()
        }
    };
    line.settle(&dispatched, &outcome)
}

/// Forwards a cart mutation posted by the cart page script.
pub async fn apply_cart_action<R>(
    repo: &R,
    session: &SessionTokens,
    form: CartActionForm,
) -> ServiceResult<ActionResponse>
where
    R: CartWriter + ?Sized,
{
    ensure_signed_in(session)?;
    let mutation = CartMutation::try_from(form)?;

    match repo.apply_cart_mutation(&mutation).await {
        Ok(outcome) => {
            let notification = (!outcome.success).then(|| {
                log::warn!(
                    "Cart mutation {} rejected for item {}: {:?}",
                    mutation.action(),
                    mutation.cart_item_id(),
                    outcome.error_msg
                );
                outcome
                    .error_msg
                    .clone()
                    .map(Notification::error)
                    .unwrap_or_else(Notification::generic_failure)
            });
            Ok(ActionResponse::from_outcome(outcome, notification))
        }
        Err(ApiError::Unauthorized) => Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to apply cart mutation: {err}");
            Ok(ActionResponse::rejected(Notification::generic_failure()))
        }
    }
}

/// Applies one quantity control of the no-script cart form.
///
/// The line starts from the quantity the backend reports, so the request
/// carries the absolute target quantity. Returns the notification to flash
/// when the mutation failed.
pub async fn step_cart_item<R>(
    repo: &R,
    session: &SessionTokens,
    cart_item_id: &CartItemId,
    step: CartStep,
) -> ServiceResult<Option<Notification>>
where
    R: CartReader + CartWriter + ?Sized,
{
    ensure_signed_in(session)?;

    let cart = repo.get_cart().await.map_err(|err| {
        log::error!("Failed to load cart: {err}");
        err
    })?;
    let item = cart
        .items
        .iter()
        .find(|item| item.id == cart_item_id.as_str())
        .ok_or(ServiceError::NotFound)?;

    let mut line = OptimisticQuantity::new(cart_item_id.clone(), item.quantity);
    let dispatched = match step {
        CartStep::Increment => line.increment(),
        CartStep::Decrement => match line.decrement() {
            Some(dispatched) => dispatched,
            None => return Ok(None),
        },
        CartStep::Toggle => line.toggle_selected(),
    };

    Ok(dispatch_quantity_change(repo, &mut line, dispatched).await)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::domain::cart::{Cart, CartItem, CartSummary};
    use crate::state::notification::{GENERIC_FAILURE, NotificationLevel};
    use crate::state::optimistic::MutationPhase;

    fn signed_in() -> SessionTokens {
        SessionTokens {
            private_token: Some("private".to_string()),
            ..SessionTokens::default()
        }
    }

    fn item(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: "Linen shirt".to_string(),
            color: "White".to_string(),
            category: "Shirts".to_string(),
            size: "M".to_string(),
            price: 40.0,
            img: None,
            variation_code: format!("SHIRT-{id}"),
            quantity,
            is_selected: true,
            is_discount_applied: false,
            discounted_price: Some(30.0),
        }
    }

    fn cart() -> Cart {
        Cart {
            items: vec![item("1", 1), item("2", 3)],
            summary: CartSummary {
                sub_total: 160.0,
                discount: 40.0,
                total_amount: 120.0,
            },
        }
    }

    fn form(body: &str) -> CartActionForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[actix_web::test]
    async fn anonymous_visitor_cannot_load_cart() {
        let mut repo = MockBackend::new();
        repo.expect_get_cart().times(0);

        let result = load_cart(&repo, &SessionTokens::default()).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn cart_lines_carry_display_flags() {
        let mut repo = MockBackend::new();
        repo.expect_get_cart().times(1).returning(|| Ok(cart()));

        let data = load_cart(&repo, &signed_in()).await.unwrap();
        assert_eq!(data.item_count, 4);
        assert!(data.lines[0].shows_remove);
        assert!(!data.lines[1].shows_remove);
        assert!(data.lines[1].has_discount);
    }

    #[actix_web::test]
    async fn rejected_action_carries_backend_message() {
        let mut repo = MockBackend::new();
        repo.expect_apply_cart_mutation()
            .withf(|mutation| {
                *mutation
                    == CartMutation::UpdateQuantity {
                        cart_item_id: CartItemId::new("2").unwrap(),
                        quantity: 9,
                    }
            })
            .times(1)
            .returning(|_| Ok(MutationOutcome::failed("Only 5 left")));

        let response = apply_cart_action(
            &repo,
            &signed_in(),
            form("actionName=update-item-quantity&cartItemId=2&quantity=9"),
        )
        .await
        .unwrap();

        assert!(!response.success);
        assert_eq!(response.error_msg.as_deref(), Some("Only 5 left"));
        assert_eq!(
            response.notification.map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    #[actix_web::test]
    async fn transport_failure_becomes_generic_notification() {
        let mut repo = MockBackend::new();
        repo.expect_apply_cart_mutation()
            .returning(|_| Err(ApiError::Timeout));

        let response = apply_cart_action(
            &repo,
            &signed_in(),
            form("actionName=toggle-is-selected&cartItemId=2"),
        )
        .await
        .unwrap();

        assert!(!response.success);
        assert_eq!(response.error_msg.as_deref(), Some(GENERIC_FAILURE));
    }

    #[actix_web::test]
    async fn unknown_action_never_reaches_backend() {
        let mut repo = MockBackend::new();
        repo.expect_apply_cart_mutation().times(0);

        let result =
            apply_cart_action(&repo, &signed_in(), form("actionName=remove&cartItemId=2")).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn dispatch_rolls_back_on_transport_failure() {
        let mut repo = MockBackend::new();
        repo.expect_apply_cart_mutation()
            .times(1)
            .returning(|_| Err(ApiError::Transport("connection reset".to_string())));

        let mut line = OptimisticQuantity::new(CartItemId::new("2").unwrap(), 3);
        let dispatched = line.increment();
        assert_eq!(line.displayed(), 4);

        let notification = dispatch_quantity_change(&repo, &mut line, dispatched).await;
        assert_eq!(line.displayed(), 3);
        assert_eq!(line.phase(), MutationPhase::RolledBack);
        assert_eq!(notification.unwrap().message, GENERIC_FAILURE);
    }

    #[actix_web::test]
    async fn step_sends_absolute_quantity() {
        let mut repo = MockBackend::new();
        repo.expect_get_cart().returning(|| Ok(cart()));
        repo.expect_apply_cart_mutation()
            .withf(|mutation| {
                *mutation
                    == CartMutation::UpdateQuantity {
                        cart_item_id: CartItemId::new("1").unwrap(),
                        quantity: 0,
                    }
            })
            .times(1)
            .returning(|_| Ok(MutationOutcome::succeeded()));

        let notification = step_cart_item(
            &repo,
            &signed_in(),
            &CartItemId::new("1").unwrap(),
            CartStep::Decrement,
        )
        .await
        .unwrap();
        assert_eq!(notification, None);
    }

    #[actix_web::test]
    async fn step_on_missing_line_is_not_found() {
        let mut repo = MockBackend::new();
        repo.expect_get_cart().returning(|| Ok(cart()));
        repo.expect_apply_cart_mutation().times(0);

        let result = step_cart_item(
            &repo,
            &signed_in(),
            &CartItemId::new("99").unwrap(),
            CartStep::Increment,
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
