//! Order and payment rows.
//!
//! Orders embed their item list as a serialized array rather than
//! normalized rows; the store is the sole arbiter of consistency.

use crate::money::Currency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of an order's denormalized item list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product ID as supplied by the caller
    pub product_id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Caller-supplied unit price in major units
    pub price: f64,

    pub quantity: u32,
}

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment status recorded on the order row.
/// Transitions past `pending` arrive via the processor webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Shipping details captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// An order row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Human-readable order number, generated by the caller
    pub order_number: String,

    /// Denormalized item list
    pub items: Vec<OrderItem>,

    pub subtotal: f64,

    #[serde(default)]
    pub shipping_cost: f64,

    pub total: f64,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    pub shipping: ShippingDetails,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new order
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping: ShippingDetails,
    pub updated_at: DateTime<Utc>,
}

/// A payment row: one per processor attempt, never updated here after
/// creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,

    /// Order reference by id, when the checkout flow knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,

    /// Order reference by number, used by the legacy intent flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Processor's payment-intent identifier
    pub payment_intent_id: String,

    /// Pre-rounded major-unit total
    pub amount: f64,

    pub currency: Currency,

    #[serde(default)]
    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
}

/// Insert payload for a payment row
#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub payment_intent_id: String,
    pub amount: f64,
    pub currency: Currency,
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"paid\""
        );
    }

    #[test]
    fn test_payment_references_are_optional() {
        let payment = NewPayment {
            order_id: None,
            order_number: Some("ORD-1001".into()),
            payment_intent_id: "pi_123".into(),
            amount: 36.97,
            currency: Currency::USD,
            status: PaymentStatus::Pending,
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert!(json.get("order_id").is_none());
        assert_eq!(json["order_number"], "ORD-1001");
    }
}
