use serde::{Deserialize, Serialize};

use crate::domain::account::Address;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// CSS modifier used by the order badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderProduct {
    pub variation_code: String,
    #[serde(default)]
    pub first_image_url: Option<String>,
}

/// Row of the order history (`GET /user/orders`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub order_id: String,
    pub order_status: OrderStatus,
    pub update_date: String,
    #[serde(default)]
    pub products: Vec<OrderProduct>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub variation_code: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub img: Option<String>,
}

/// Full order as returned by `GET /user/orders/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_date: String,
    pub status_name: OrderStatus,
    pub sub_total: f64,
    #[serde(default)]
    pub discount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub shipping_address: Address,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Checkout request forwarded to `POST /user/checkout`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub bank_card_id: String,
    pub address_id: String,
    pub promo_code_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_fail_decoding() {
        let order: OrderSummary = serde_json::from_str(
            r#"{"order_id":"A1","order_status":"Returned","update_date":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(order.order_status, OrderStatus::Unknown);
        assert!(order.products.is_empty());
    }
}
