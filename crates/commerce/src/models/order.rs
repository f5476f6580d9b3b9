//! Order snapshot types.
//!
//! An order is created atomically from checkout data and is structurally
//! immutable afterwards: the line items, shipping address, method, and total
//! never change. Only the fulfillment status fields (and their timestamps)
//! are mutated post-creation, and the order is never deleted - cancellation
//! is a status value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trendora_core::{DeliveryStatus, OrderId, OrderStatus, PaymentStatus, ProductId, ShippingMethod, UserId};

/// One line in an order.
///
/// Prices are not re-snapshotted onto order lines; the money for the whole
/// order lives in [`Order::total_amount`], fixed at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// The catalog product this line refers to.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: i32,
    /// Chosen size, if any.
    pub size: Option<String>,
    /// Chosen color, if any.
    pub color: Option<String>,
}

/// Where the order ships to. All fields are required and non-blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// The first required field that is blank, if any.
    #[must_use]
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("postal_code", &self.postal_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user. Orders are only readable by their owner on the
    /// customer API.
    pub user_id: UserId,
    /// Line items, immutable after creation.
    pub items: Vec<OrderItem>,
    /// Shipping address, immutable after creation.
    pub shipping_address: ShippingAddress,
    /// Chosen shipping method.
    pub shipping_method: ShippingMethod,
    /// Total charged, computed at checkout and never re-derived.
    pub total_amount: Decimal,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// When payment was first confirmed.
    pub paid_at: Option<DateTime<Utc>>,
    /// Delivery state.
    pub delivery_status: DeliveryStatus,
    /// When delivery was first confirmed.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Workflow status.
    pub status: OrderStatus,
    /// Optimistic-concurrency token, bumped by the store on every save.
    pub version: i64,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a new order. Status fields start at their defaults
/// (`unpaid`, `undelivered`, `pending`).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub shipping_method: ShippingMethod,
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            address: "12 Analytical Way".to_owned(),
            city: "London".to_owned(),
            state: "LDN".to_owned(),
            country: "UK".to_owned(),
            postal_code: "N1 9GU".to_owned(),
        }
    }

    #[test]
    fn test_complete_address_has_no_blank_field() {
        assert_eq!(address().first_blank_field(), None);
    }

    #[test]
    fn test_blank_and_whitespace_fields_are_reported() {
        let mut addr = address();
        addr.city = String::new();
        assert_eq!(addr.first_blank_field(), Some("city"));

        let mut addr = address();
        addr.postal_code = "   ".to_owned();
        assert_eq!(addr.first_blank_field(), Some("postal_code"));
    }
}
