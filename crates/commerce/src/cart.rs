//! Cart operations.
//!
//! Each operation is a read-modify-write cycle over the record store:
//! fetch the cart, mutate the aggregate, recompute the total, persist.
//! Persistence is a compare-and-swap on the cart's version; on conflict the
//! whole cycle is retried a bounded number of times so racing mutations for
//! the same user never drop each other's changes.

use std::sync::Arc;

use trendora_core::{CartItemId, ProductId, UserId};

use crate::error::CommerceError;
use crate::models::Cart;
use crate::store::{CommerceStore, StoreError};

/// Attempts per mutation before giving up with a conflict error.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// How a mutation locates the user's cart.
#[derive(Clone, Copy)]
enum Lookup {
    /// Create an empty cart when the user has none (add/read semantics).
    GetOrCreate,
    /// Fail with `NotFound` when the user has no cart (update/remove/clear
    /// semantics).
    Existing,
}

/// Cart application service.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CommerceStore>,
}

impl CartService {
    /// Create a service over a record store.
    #[must_use]
    pub fn new(store: Arc<dyn CommerceStore>) -> Self {
        Self { store }
    }

    /// Return the user's cart, lazily creating an empty one.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Storage` if the store fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, CommerceError> {
        Ok(self.store.get_or_create_cart(user_id).await?)
    }

    /// Add a product to the user's cart.
    ///
    /// Merges with an existing line when one already references the same
    /// product (merge key: product ID only - see [`Cart::add_item`]).
    /// Quantity validation is the caller's responsibility; this operation
    /// applies whatever increment it is given.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the product does not exist,
    /// `CommerceError::Conflict` when concurrent mutations exhaust the
    /// retries.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<Cart, CommerceError> {
        let product = self
            .store
            .find_product(product_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("product {product_id} not found")))?;

        self.mutate(user_id, Lookup::GetOrCreate, |cart| {
            cart.add_item(&product, quantity, size.clone(), color.clone());
            Ok(())
        })
        .await
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the user has no cart or the
    /// item is not in it.
    pub async fn update_item_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<Cart, CommerceError> {
        self.mutate(user_id, Lookup::Existing, |cart| {
            if cart.set_item_quantity(item_id, quantity) {
                Ok(())
            } else {
                Err(CommerceError::NotFound(format!(
                    "item {item_id} not found in cart"
                )))
            }
        })
        .await
    }

    /// Remove a line from the user's cart.
    ///
    /// Removing an item ID that is not present leaves the cart unchanged
    /// and succeeds - a designed no-op, intentionally more permissive than
    /// the update operation.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the user has no cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<Cart, CommerceError> {
        self.mutate(user_id, Lookup::Existing, |cart| {
            cart.remove_item(item_id);
            Ok(())
        })
        .await
    }

    /// Empty the user's cart in place.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the user has no cart.
    pub async fn clear(&self, user_id: UserId) -> Result<Cart, CommerceError> {
        self.mutate(user_id, Lookup::Existing, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    /// Run one read-modify-write cycle, retrying on version conflicts.
    async fn mutate<F>(
        &self,
        user_id: UserId,
        lookup: Lookup,
        mut apply: F,
    ) -> Result<Cart, CommerceError>
    where
        F: FnMut(&mut Cart) -> Result<(), CommerceError>,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let mut cart = match lookup {
                Lookup::GetOrCreate => self.store.get_or_create_cart(user_id).await?,
                Lookup::Existing => self
                    .store
                    .find_cart_by_user(user_id)
                    .await?
                    .ok_or_else(|| {
                        CommerceError::NotFound(format!("cart for user {user_id} not found"))
                    })?,
            };

            apply(&mut cart)?;

            match self.store.save_cart(&cart).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::VersionConflict) => {
                    tracing::debug!(%user_id, attempt, "cart version conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CommerceError::Conflict(format!(
            "cart for user {user_id} is being modified concurrently"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::models::NewProduct;
    use crate::store::MemoryStore;

    async fn service_with_product(price: i64) -> (CartService, ProductId) {
        let store = Arc::new(MemoryStore::new());
        let product = store
            .insert_product(NewProduct {
                name: "Jacket".to_owned(),
                description: String::new(),
                price: Decimal::from(price),
                image: "/img/jacket.jpg".to_owned(),
                category: "Outerwear".to_owned(),
                stock: 10,
                sizes: vec!["M".to_owned(), "L".to_owned()],
                colors: vec!["black".to_owned()],
            })
            .await
            .expect("product");
        (CartService::new(store), product.id)
    }

    #[tokio::test]
    async fn test_read_creates_empty_cart() {
        let (service, _) = service_with_product(40).await;
        let cart = service.get_or_create(UserId::new(1)).await.expect("cart");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let (service, _) = service_with_product(40).await;
        let err = service
            .add_item(UserId::new(1), ProductId::new(999), 1, None, None)
            .await
            .expect_err("missing product");
        assert!(matches!(err, CommerceError::NotFound(_)));

        // The failed add did not create a cart as a side effect.
        let cart = service.get_or_create(UserId::new(1)).await.expect("cart");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_worked_example_scenario() {
        // add 2 @ 40 (size M) -> total 80; add 1 more (size L) merges -> 120;
        // absolute update to 5 -> 200.
        let (service, product_id) = service_with_product(40).await;
        let user = UserId::new(1);

        let cart = service
            .add_item(user, product_id, 2, Some("M".to_owned()), None)
            .await
            .expect("add");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, Decimal::from(80));

        let cart = service
            .add_item(user, product_id, 1, Some("L".to_owned()), None)
            .await
            .expect("add");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, Decimal::from(120));

        let item_id = cart.items.first().expect("item").id;
        let cart = service
            .update_item_quantity(user, item_id, 5)
            .await
            .expect("update");
        assert_eq!(cart.items.first().expect("item").quantity, 5);
        assert_eq!(cart.total_price, Decimal::from(200));
    }

    #[tokio::test]
    async fn test_update_requires_existing_cart_and_item() {
        let (service, product_id) = service_with_product(40).await;
        let user = UserId::new(1);

        let err = service
            .update_item_quantity(user, CartItemId::new(1), 2)
            .await
            .expect_err("no cart yet");
        assert!(matches!(err, CommerceError::NotFound(_)));

        service
            .add_item(user, product_id, 1, None, None)
            .await
            .expect("add");
        let err = service
            .update_item_quantity(user, CartItemId::new(99), 2)
            .await
            .expect_err("no such item");
        assert!(matches!(err, CommerceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_item_succeeds_unchanged() {
        let (service, product_id) = service_with_product(40).await;
        let user = UserId::new(1);

        service
            .add_item(user, product_id, 2, None, None)
            .await
            .expect("add");
        let cart = service
            .remove_item(user, CartItemId::new(99))
            .await
            .expect("no-op remove");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, Decimal::from(80));
    }

    #[tokio::test]
    async fn test_remove_without_cart_fails() {
        let (service, _) = service_with_product(40).await;
        let err = service
            .remove_item(UserId::new(1), CartItemId::new(1))
            .await
            .expect_err("no cart");
        assert!(matches!(err, CommerceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_clear_twice_is_idempotent() {
        let (service, product_id) = service_with_product(40).await;
        let user = UserId::new(1);

        service
            .add_item(user, product_id, 3, None, None)
            .await
            .expect("add");

        let cart = service.clear(user).await.expect("clear");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);

        let cart = service.clear(user).await.expect("clear again");
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_adds_do_not_drop_lines() {
        let (service, product_id) = service_with_product(10).await;
        let user = UserId::new(1);

        let (a, b) = tokio::join!(
            service.add_item(user, product_id, 1, None, None),
            service.add_item(user, product_id, 2, None, None),
        );
        a.expect("first add");
        b.expect("second add");

        let cart = service.get_or_create(user).await.expect("cart");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().expect("item").quantity, 3);
        assert_eq!(cart.total_price, Decimal::from(30));
    }

    #[tokio::test]
    async fn test_carts_are_isolated_per_user() {
        let (service, product_id) = service_with_product(10).await;

        service
            .add_item(UserId::new(1), product_id, 1, None, None)
            .await
            .expect("add");
        let other = service.get_or_create(UserId::new(2)).await.expect("cart");
        assert!(other.is_empty());
    }
}
