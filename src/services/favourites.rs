//! Saved products.

use crate::api::{ApiError, FavouriteReader, FavouriteWriter};
use crate::domain::session::SessionTokens;
use crate::domain::types::VariationCode;
use crate::dto::cart::ActionResponse;
use crate::dto::products::ProductCard;
use crate::forms::cart::FavouriteForm;
use crate::services::{ServiceError, ServiceResult, ensure_signed_in};
use crate::state::favourite::FavouriteToggle;
use crate::state::notification::Notification;

pub async fn list_favourites<R>(
    repo: &R,
    session: &SessionTokens,
) -> ServiceResult<Vec<ProductCard>>
where
    R: FavouriteReader + ?Sized,
{
    ensure_signed_in(session)?;

    let products = repo.list_favourites().await.map_err(|err| {
        log::error!("Failed to list favourites: {err}");
        err
    })?;
    Ok(products.into_iter().map(ProductCard::from).collect())
}

/// Toggles the saved flag of one variation.
///
/// Anonymous visitors get a warning and nothing is sent.
pub async fn toggle_favourite<R>(
    repo: &R,
    session: &SessionTokens,
    form: FavouriteForm,
) -> ServiceResult<ActionResponse>
where
    R: FavouriteWriter + ?Sized,
{
    let was_favourite = form.is_favourite;
    let variation_code = VariationCode::try_from(form)?;
    let mut toggle = FavouriteToggle::new(variation_code, was_favourite);

    let request = match toggle.toggle(session.is_authenticated()) {
        Ok(request) => request,
        Err(notification) => return Ok(ActionResponse::rejected(notification)),
    };

    let outcome = match repo.toggle_favourite(&request.variation_code).await {
        Ok(outcome) => outcome,
        Err(ApiError::Unauthorized) => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!(
                "Failed to toggle favourite {}: {err}",
                request.variation_code
            );
            return Ok(ActionResponse {
                is_favourite: Some(was_favourite),
                ..ActionResponse::rejected(Notification::generic_failure())
            });
        }
    };

    let notification = toggle.settle(&outcome);
    Ok(ActionResponse {
        is_favourite: Some(toggle.displayed()),
        ..ActionResponse::from_outcome(outcome, notification)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::domain::mutation::MutationOutcome;
    use crate::state::favourite::SIGN_IN_TO_SAVE;
    use crate::state::notification::NotificationLevel;

    fn form(code: &str, is_favourite: bool) -> FavouriteForm {
        FavouriteForm {
            variation_code: code.to_string(),
            is_favourite,
        }
    }

    fn signed_in() -> SessionTokens {
        SessionTokens {
            private_token: Some("private".to_string()),
            ..SessionTokens::default()
        }
    }

    #[actix_web::test]
    async fn anonymous_toggle_sends_nothing() {
        let mut repo = MockBackend::new();
        repo.expect_toggle_favourite().times(0);

        let response = toggle_favourite(&repo, &SessionTokens::default(), form("TEE-S", false))
            .await
            .unwrap();
        assert!(!response.success);
        let notification = response.notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Warning);
        assert_eq!(notification.message, SIGN_IN_TO_SAVE);
    }

    #[actix_web::test]
    async fn successful_toggle_flips_flag() {
        let mut repo = MockBackend::new();
        repo.expect_toggle_favourite()
            .withf(|code| code.as_str() == "TEE-S")
            .times(1)
            .returning(|_| Ok(MutationOutcome::succeeded()));

        let response = toggle_favourite(&repo, &signed_in(), form("TEE-S", false))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.is_favourite, Some(true));
        assert_eq!(response.notification, None);
    }

    #[actix_web::test]
    async fn failed_toggle_keeps_flag() {
        let mut repo = MockBackend::new();
        repo.expect_toggle_favourite()
            .returning(|_| Ok(MutationOutcome::default()));

        let response = toggle_favourite(&repo, &signed_in(), form("TEE-S", true))
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.is_favourite, Some(true));
        assert!(response.notification.is_some());
    }

    #[actix_web::test]
    async fn blank_code_is_rejected() {
        let repo = MockBackend::new();
        let result = toggle_favourite(&repo, &signed_in(), form("  ", false)).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
