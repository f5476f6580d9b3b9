//! Derived checkout totals.
//!
//! Pure functions of the cart's current items and the selected shipping
//! method. These values are displayed to the client and folded into an
//! order's `total_amount` at checkout; they are never persisted as
//! source-of-truth on the cart.

use rust_decimal::Decimal;
use serde::Serialize;

use trendora_core::ShippingMethod;

use crate::models::CartItem;

/// Subtotals above this ship free with the standard method, in whole
/// currency units.
pub const FREE_SHIPPING_THRESHOLD: i64 = 100;

/// Flat standard shipping fee below the threshold.
pub const STANDARD_SHIPPING_FEE: i64 = 10;

/// Flat express shipping fee, charged regardless of subtotal.
pub const EXPRESS_SHIPPING_FEE: i64 = 20;

/// A checkout quote: subtotal, shipping, and the grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Sum of `price * quantity` over the given items.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Shipping fee for a subtotal and method.
///
/// Express always costs the flat express fee; standard is free strictly
/// above the threshold and the flat standard fee otherwise.
#[must_use]
pub fn shipping_fee(subtotal: Decimal, method: ShippingMethod) -> Decimal {
    match method {
        ShippingMethod::Express => Decimal::from(EXPRESS_SHIPPING_FEE),
        ShippingMethod::Standard => {
            if subtotal > Decimal::from(FREE_SHIPPING_THRESHOLD) {
                Decimal::ZERO
            } else {
                Decimal::from(STANDARD_SHIPPING_FEE)
            }
        }
    }
}

/// Full quote for a set of items and a shipping method.
#[must_use]
pub fn quote(items: &[CartItem], method: ShippingMethod) -> CartTotals {
    let subtotal = subtotal(items);
    let shipping = shipping_fee(subtotal, method);
    CartTotals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}
