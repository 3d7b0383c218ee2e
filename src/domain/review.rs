use serde::Serialize;

use crate::domain::types::VariationCode;

/// Lowest and highest star rating a review may carry.
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// Review of one product variation, as sent to the backend.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub variation_code: VariationCode,
    pub stars: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
