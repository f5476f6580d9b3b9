//! Process-local store backend.
//!
//! Backs tests, the in-process integration suite, and local development.
//! All records live behind one async mutex, so every operation is trivially
//! atomic; the version checks in [`MemoryStore::save_cart`] and
//! [`MemoryStore::save_order`] still exercise the same compare-and-swap
//! contract the `PostgreSQL` backend has.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use trendora_core::{CartId, OrderId, ProductId, UserId};

use crate::models::{Cart, NewOrder, NewProduct, Order, Product};

use super::{CommerceStore, StoreError};

#[derive(Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    carts: HashMap<UserId, Cart>,
    orders: HashMap<OrderId, Order>,
    sessions: HashMap<String, UserId>,
    next_product_id: i32,
    next_cart_id: i32,
    next_order_id: i32,
}

/// In-memory implementation of [`CommerceStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommerceStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.lock().await;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
            category: product.category,
            stock: product.stock,
            sizes: product.sizes,
            colors: product.colors,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.carts.get(&user_id).cloned())
    }

    async fn get_or_create_cart(&self, user_id: UserId) -> Result<Cart, StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(cart) = inner.carts.get(&user_id) {
            return Ok(cart.clone());
        }
        inner.next_cart_id += 1;
        let cart = Cart::empty(CartId::new(inner.next_cart_id), user_id, Utc::now());
        inner.carts.insert(user_id, cart.clone());
        Ok(cart)
    }

    async fn save_cart(&self, cart: &Cart) -> Result<Cart, StoreError> {
        let mut inner = self.inner.lock().await;
        let stored = inner
            .carts
            .get_mut(&cart.user_id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != cart.version {
            return Err(StoreError::VersionConflict);
        }
        let mut updated = cart.clone();
        updated.version += 1;
        updated.updated_at = Utc::now();
        *stored = updated.clone();
        Ok(updated)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_order_id += 1;
        let order = Order {
            id: OrderId::new(inner.next_order_id),
            user_id: order.user_id,
            items: order.items,
            shipping_address: order.shipping_address,
            shipping_method: order.shipping_method,
            total_amount: order.total_amount,
            payment_status: trendora_core::PaymentStatus::Unpaid,
            paid_at: None,
            delivery_status: trendora_core::DeliveryStatus::Undelivered,
            delivered_at: None,
            status: trendora_core::OrderStatus::Pending,
            version: 1,
            created_at: Utc::now(),
        };
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.orders.get(&id).cloned())
    }

    async fn list_orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.lock().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.lock().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn save_order(&self, order: &Order) -> Result<Order, StoreError> {
        let mut inner = self.inner.lock().await;
        let stored = inner
            .orders
            .get_mut(&order.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != order.version {
            return Err(StoreError::VersionConflict);
        }
        let mut updated = order.clone();
        updated.version += 1;
        *stored = updated.clone();
        Ok(updated)
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.sessions.get(token).copied())
    }

    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(token.to_owned(), user_id);
        Ok(())
    }
}
