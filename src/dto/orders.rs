use serde::Serialize;

use crate::domain::account::{Address, Country, PaymentCard};
use crate::domain::cart::Cart;
use crate::domain::order::{OrderDetails, OrderSummary};

#[derive(Debug, Serialize)]
pub struct OrdersPageData {
    pub orders: Vec<OrderSummary>,
}

#[derive(Debug, Serialize)]
pub struct OrderPageData {
    pub order_id: String,
    pub order: OrderDetails,
}

/// Everything the checkout page needs: totals with the promo code applied,
/// and the visitor's saved addresses and cards.
#[derive(Debug, Serialize)]
pub struct CheckoutPageData {
    pub cart: Cart,
    pub addresses: Vec<Address>,
    pub cards: Vec<PaymentCard>,
    pub countries: Vec<Country>,
    pub promo_code: Option<String>,
}
