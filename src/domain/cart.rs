use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CartItemId, TypeConstraintError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: String,
    pub price: f64,
    #[serde(default)]
    pub img: Option<String>,
    pub variation_code: String,
    pub quantity: u32,
    #[serde(default = "default_selected")]
    pub is_selected: bool,
    #[serde(default)]
    pub is_discount_applied: bool,
    #[serde(default)]
    pub discounted_price: Option<f64>,
}

fn default_selected() -> bool {
    true
}

impl CartItem {
    /// A discount is shown only when the discounted price differs from the list price.
    pub fn has_visible_discount(&self) -> bool {
        self.discounted_price
            .is_some_and(|discounted| (discounted - self.price).abs() > f64::EPSILON)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total_amount: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub summary: CartSummary,
}

impl Cart {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Verb sent as `actionName` with every cart mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartAction {
    UpdateItemQuantity,
    ToggleIsSelected,
}

impl CartAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CartAction::UpdateItemQuantity => "update-item-quantity",
            CartAction::ToggleIsSelected => "toggle-is-selected",
        }
    }
}

impl Display for CartAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartAction {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "update-item-quantity" => Ok(CartAction::UpdateItemQuantity),
            "toggle-is-selected" => Ok(CartAction::ToggleIsSelected),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown cart action {other}"
            ))),
        }
    }
}

/// A validated cart mutation ready to be forwarded to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartMutation {
    UpdateQuantity {
        cart_item_id: CartItemId,
        quantity: u32,
    },
    ToggleSelected {
        cart_item_id: CartItemId,
    },
}

/// Form-encoded wire shape of a cart mutation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartMutationPayload<'a> {
    action_name: &'a str,
    cart_item_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<String>,
}

impl CartMutation {
    pub fn action(&self) -> CartAction {
        match self {
            CartMutation::UpdateQuantity { .. } => CartAction::UpdateItemQuantity,
            CartMutation::ToggleSelected { .. } => CartAction::ToggleIsSelected,
        }
    }

    pub fn cart_item_id(&self) -> &CartItemId {
        match self {
            CartMutation::UpdateQuantity { cart_item_id, .. }
            | CartMutation::ToggleSelected { cart_item_id } => cart_item_id,
        }
    }

    /// Encodes the mutation as the `application/x-www-form-urlencoded` body
    /// accepted by `POST /cart`.
    pub fn to_form(&self) -> String {
        let payload = CartMutationPayload {
            action_name: self.action().as_str(),
            cart_item_id: self.cart_item_id().as_str(),
            quantity: match self {
                CartMutation::UpdateQuantity { quantity, .. } => Some(quantity.to_string()),
                CartMutation::ToggleSelected { .. } => None,
            },
        };
        serde_html_form::to_string(&payload).unwrap_or_else(|err| {
            log::error!("Failed to encode cart mutation: {err}");
            String::new()
        })
    }
}
