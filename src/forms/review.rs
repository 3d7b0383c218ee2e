//! Product review form.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::review::{MAX_STARS, MIN_STARS, NewReview};
use crate::domain::types::VariationCode;
use crate::forms::{FormError, non_blank};

pub const RATING_REQUIRED: &str = "Please add a rating before submission";

fn parse_stars(value: &str) -> Option<u8> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|stars| (MIN_STARS..=MAX_STARS).contains(stars))
}

fn validate_stars(value: &str) -> Result<(), ValidationError> {
    parse_stars(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("stars").with_message(Cow::Borrowed(RATING_REQUIRED)))
}

/// Body of `POST /review`. An unrated form posts `stars=0`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReviewForm {
    #[serde(default)]
    #[validate(custom(function = "validate_stars"))]
    pub stars: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "The review can be at most 1000 characters long."))]
    pub comment: String,
    #[serde(default, rename = "variationCode")]
    pub variation_code: String,
}

impl TryFrom<ReviewForm> for NewReview {
    type Error = FormError;

    fn try_from(form: ReviewForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let stars = parse_stars(&form.stars)
            .ok_or_else(|| FormError::InvalidValue(format!("stars {}", form.stars)))?;
        Ok(Self {
            variation_code: VariationCode::new(form.variation_code)?,
            stars,
            comment: non_blank(&form.comment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_form_builds_review() {
        let form: ReviewForm =
            serde_html_form::from_str("comment=Fits+well&stars=4&variationCode=TEE-S").unwrap();
        let review = NewReview::try_from(form).unwrap();
        assert_eq!(review.stars, 4);
        assert_eq!(review.variation_code.as_str(), "TEE-S");
        assert_eq!(review.comment.as_deref(), Some("Fits well"));
    }

    #[test]
    fn missing_rating_is_rejected() {
        for stars in ["0", "6", "", "five"] {
            let form = ReviewForm {
                stars: stars.to_string(),
                comment: "Nice".to_string(),
                variation_code: "TEE-S".to_string(),
            };
            let err = NewReview::try_from(form).unwrap_err();
            assert_eq!(err.field_errors().get("stars"), Some(RATING_REQUIRED), "{stars}");
        }
    }

    #[test]
    fn comment_is_optional_and_bounded() {
        let form = ReviewForm {
            stars: "5".to_string(),
            comment: "  ".to_string(),
            variation_code: "TEE-S".to_string(),
        };
        assert_eq!(NewReview::try_from(form).unwrap().comment, None);

        let form = ReviewForm {
            stars: "5".to_string(),
            comment: "a".repeat(1001),
            variation_code: "TEE-S".to_string(),
        };
        let err = NewReview::try_from(form).unwrap_err();
        assert!(err.field_errors().get("comment").is_some());
    }

    #[test]
    fn blank_variation_code_is_invalid() {
        let form = ReviewForm {
            stars: "3".to_string(),
            comment: String::new(),
            variation_code: " ".to_string(),
        };
        assert!(matches!(
            NewReview::try_from(form),
            Err(FormError::InvalidValue(_))
        ));
    }
}
