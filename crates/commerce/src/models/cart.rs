//! The per-user cart aggregate.
//!
//! A cart is a mutable collection of line items plus a cached total. The
//! total is a derived projection: every structural mutation recomputes it
//! before the cart is persisted, so it is never stale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trendora_core::{CartId, CartItemId, ProductId, UserId};

use super::product::Product;

/// One line in a cart.
///
/// `name`, `price`, and `image` are a snapshot taken when the item was
/// added; they are deliberately not re-synced from the catalog on later
/// reads, so the price shown is the price at time of add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Synthetic item ID, unique within its cart, assigned at insertion.
    pub id: CartItemId,
    /// The catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name at time of add.
    pub name: String,
    /// Unit price at time of add.
    pub price: Decimal,
    /// Image reference at time of add.
    pub image: String,
    /// Number of units. Positive in a well-formed cart; callers validate.
    pub quantity: i32,
    /// Chosen size, if any.
    pub size: Option<String>,
    /// Chosen color, if any.
    pub color: Option<String>,
}

impl CartItem {
    /// The line total (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A user's shopping cart.
///
/// At most one non-deleted cart exists per user; the storage layer enforces
/// this with a uniqueness constraint. Carts are created lazily and never
/// deleted - clearing empties them in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// Line items in insertion order.
    pub items: Vec<CartItem>,
    /// Cached sum of `price * quantity` over all items.
    pub total_price: Decimal,
    /// Monotonic counter assigning `CartItemId`s within this cart.
    pub next_item_id: i32,
    /// Optimistic-concurrency token, bumped by the store on every save.
    pub version: i64,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last persisted.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create a fresh empty cart for a user.
    #[must_use]
    pub fn empty(id: CartId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            items: Vec::new(),
            total_price: Decimal::ZERO,
            next_item_id: 1,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart, merging with an existing line when one
    /// already references the same product.
    ///
    /// The merge key is the product ID only - size and color are not part
    /// of it. Adding the same product with a different size increments the
    /// existing line instead of creating a second one. This mirrors the
    /// reference behavior and is documented as the cart's merge policy.
    /// Merged quantities saturate at `i32::MAX` rather than wrapping.
    ///
    /// Returns the ID of the affected line.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i32,
        size: Option<String>,
        color: Option<String>,
    ) -> CartItemId {
        let item_id = if let Some(existing) =
            self.items.iter_mut().find(|i| i.product_id == product.id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            existing.id
        } else {
            let id = CartItemId::new(self.next_item_id);
            self.next_item_id += 1;
            self.items.push(CartItem {
                id,
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity,
                size,
                color,
            });
            id
        };
        self.recompute_total();
        item_id
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// Returns `false` when no line with `item_id` exists. No lower bound is
    /// enforced here; callers validate before invoking.
    pub fn set_item_quantity(&mut self, item_id: CartItemId, quantity: i32) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return false;
        };
        item.quantity = quantity;
        self.recompute_total();
        true
    }

    /// Remove a line by ID.
    ///
    /// Silently leaves the cart unchanged when the ID is absent - this is
    /// designed no-op behavior, not an error.
    pub fn remove_item(&mut self, item_id: CartItemId) {
        self.items.retain(|i| i.id != item_id);
        self.recompute_total();
    }

    /// Empty the cart in place.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute_total();
    }

    /// Recompute the cached total from the current items.
    fn recompute_total(&mut self) {
        self.total_price = self.items.iter().map(CartItem::line_total).sum();
    }
}
