//! Product reviews.

use crate::api::ReviewWriter;
use crate::domain::review::NewReview;
use crate::domain::session::SessionTokens;
use crate::forms::review::ReviewForm;
use crate::services::{ServiceResult, ensure_signed_in};

/// Sends a review of one variation. Nothing reaches the backend when the
/// rating is missing or the comment is too long.
pub async fn submit_review<R>(
    repo: &R,
    session: &SessionTokens,
    form: ReviewForm,
) -> ServiceResult<()>
where
    R: ReviewWriter + ?Sized,
{
    ensure_signed_in(session)?;

    let review = NewReview::try_from(form)?;
    repo.add_review(&review).await.map_err(|err| {
        log::error!("Failed to submit review for {}: {err}", review.variation_code);
        err
    })?;
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockBackend;
    use crate::forms::review::RATING_REQUIRED;
    use crate::services::ServiceError;

    fn signed_in() -> SessionTokens {
        SessionTokens {
            private_token: Some("private".to_string()),
            ..SessionTokens::default()
        }
    }

    fn form(stars: &str) -> ReviewForm {
        ReviewForm {
            stars: stars.to_string(),
            comment: "Warm and soft".to_string(),
            variation_code: "SCARF-RED".to_string(),
        }
    }

    #[actix_web::test]
    async fn review_is_sent_with_rating() {
        let mut repo = MockBackend::new();
        repo.expect_add_review()
            .withf(|review| {
                review.stars == 5
                    && review.variation_code.as_str() == "SCARF-RED"
                    && review.comment.as_deref() == Some("Warm and soft")
            })
            .times(1)
            .returning(|_| Ok(()));

        submit_review(&repo, &signed_in(), form("5")).await.unwrap();
    }

    #[actix_web::test]
    async fn unrated_review_is_not_sent() {
        let mut repo = MockBackend::new();
        repo.expect_add_review().times(0);

        match submit_review(&repo, &signed_in(), form("0")).await {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.get("stars"), Some(RATING_REQUIRED));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[actix_web::test]
    async fn anonymous_review_requires_sign_in() {
        let mut repo = MockBackend::new();
        repo.expect_add_review().times(0);

        let result = submit_review(&repo, &SessionTokens::default(), form("4")).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn backend_rejection_keeps_message() {
        let mut repo = MockBackend::new();
        repo.expect_add_review().returning(|_| {
            Err(ApiError::Rejected {
                code: Some(400),
                message: Some("You already reviewed this product".to_string()),
            })
        });

        let err = submit_review(&repo, &signed_in(), form("4")).await.unwrap_err();
        assert_eq!(err.user_message(), "You already reviewed this product");
    }
}
