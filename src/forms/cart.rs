//! Cart, favourite and checkout inputs.

use serde::Deserialize;

use crate::domain::cart::{CartAction, CartMutation};
use crate::domain::order::CheckoutRequest;
use crate::domain::types::{CartItemId, VariationCode};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /cart`.
pub struct CartActionForm {
    #[serde(default)]
    pub action_name: String,
    #[serde(default)]
    pub cart_item_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl TryFrom<CartActionForm> for CartMutation {
    type Error = FormError;

    fn try_from(form: CartActionForm) -> Result<Self, Self::Error> {
        let action = form
            .action_name
            .parse::<CartAction>()
            .map_err(|_| FormError::UnknownAction(form.action_name.clone()))?;
        let cart_item_id = CartItemId::new(form.cart_item_id)?;

        match action {
            CartAction::UpdateItemQuantity => {
                let raw = form.quantity.unwrap_or_default();
                let quantity = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| FormError::InvalidValue(format!("quantity {raw}")))?;
                Ok(CartMutation::UpdateQuantity {
                    cart_item_id,
                    quantity,
                })
            }
            CartAction::ToggleIsSelected => Ok(CartMutation::ToggleSelected { cart_item_id }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /favourites`.
pub struct FavouriteForm {
    #[serde(default)]
    pub variation_code: String,
    /// Flag the heart icon showed when it was clicked.
    #[serde(default)]
    pub is_favourite: bool,
}

impl TryFrom<FavouriteForm> for VariationCode {
    type Error = FormError;

    fn try_from(form: FavouriteForm) -> Result<Self, Self::Error> {
        Ok(VariationCode::new(form.variation_code)?)
    }
}

/// Quantity control of the no-script cart form, taken from the URL path.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CartStep {
    Increment,
    Decrement,
    Toggle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Query of `GET /checkout` and `POST /checkout`.
pub struct CheckoutForm {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub address_id: String,
    #[serde(default)]
    pub promocode: String,
}

impl CheckoutForm {
    pub fn promo_code(&self) -> Option<String> {
        non_blank(&self.promocode)
    }
}

impl TryFrom<CheckoutForm> for CheckoutRequest {
    type Error = FormError;

    fn try_from(form: CheckoutForm) -> Result<Self, Self::Error> {
        let bank_card_id = non_blank(&form.card_id)
            .ok_or_else(|| FormError::InvalidValue("select a payment card".to_string()))?;
        let address_id = non_blank(&form.address_id)
            .ok_or_else(|| FormError::InvalidValue("select a delivery address".to_string()))?;
        Ok(Self {
            bank_card_id,
            address_id,
            promo_code_id: form.promo_code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_action_form_builds_quantity_update() {
        let form: CartActionForm = serde_html_form::from_str(
            "actionName=update-item-quantity&cartItemId=17&quantity=4",
        )
        .unwrap();
        assert_eq!(
            CartMutation::try_from(form).unwrap(),
            CartMutation::UpdateQuantity {
                cart_item_id: CartItemId::new("17").unwrap(),
                quantity: 4
            }
        );
    }

    #[test]
    fn cart_action_form_rejects_bad_input() {
        let form: CartActionForm =
            serde_html_form::from_str("actionName=update-item-quantity&cartItemId=17&quantity=-1")
                .unwrap();
        assert!(matches!(
            CartMutation::try_from(form),
            Err(FormError::InvalidValue(_))
        ));

        let form: CartActionForm =
            serde_html_form::from_str("actionName=remove&cartItemId=17").unwrap();
        assert!(matches!(
            CartMutation::try_from(form),
            Err(FormError::UnknownAction(_))
        ));

        let form: CartActionForm =
            serde_html_form::from_str("actionName=toggle-is-selected&cartItemId=").unwrap();
        assert!(CartMutation::try_from(form).is_err());
    }

    #[test]
    fn checkout_requires_card_and_address() {
        let form = CheckoutForm {
            card_id: "3".to_string(),
            address_id: " ".to_string(),
            promocode: String::new(),
        };
        assert!(CheckoutRequest::try_from(form).is_err());

        let form = CheckoutForm {
            card_id: "3".to_string(),
            address_id: "9".to_string(),
            promocode: "SPRING".to_string(),
        };
        let request = CheckoutRequest::try_from(form).unwrap();
        assert_eq!(request.promo_code_id.as_deref(), Some("SPRING"));
    }
}
