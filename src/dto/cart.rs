use serde::Serialize;

use crate::domain::cart::{CartItem, CartSummary};
use crate::domain::mutation::MutationOutcome;
use crate::state::notification::Notification;

#[derive(Debug, Serialize)]
pub struct CartLine {
    pub item: CartItem,
    /// The decrement control renders as "remove" at quantity one.
    pub shows_remove: bool,
    pub has_discount: bool,
}

/// Data required to render the cart page.
#[derive(Debug, Serialize)]
pub struct CartPageData {
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
    pub item_count: u32,
}

impl CartPageData {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// JSON answer of the mutation endpoints (`POST /cart`, `POST /favourites`).
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    /// Favourite flag after the toggle settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favourite: Option<bool>,
}

impl ActionResponse {
    pub fn from_outcome(outcome: MutationOutcome, notification: Option<Notification>) -> Self {
        Self {
            success: outcome.success,
            error_msg: outcome.error_msg,
            notification,
            is_favourite: None,
        }
    }

    pub fn rejected(notification: Notification) -> Self {
        Self {
            success: false,
            error_msg: Some(notification.message.clone()),
            notification: Some(notification),
            is_favourite: None,
        }
    }
}
