//! `PostgreSQL` store backend.
//!
//! Each aggregate maps to one row; cart and order line items are `JSONB`
//! documents on that row, so every save is a single atomic statement.
//! Status enums are stored as `TEXT` and parsed on read - a bad value is
//! surfaced as [`StoreError::DataCorruption`], never silently defaulted.
//!
//! Migrations live in `crates/commerce/migrations/` and run via:
//! ```bash
//! cargo run -p trendora-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use trendora_core::{
    CartId, DeliveryStatus, OrderId, OrderStatus, PaymentStatus, ProductId, ShippingMethod, UserId,
};

use crate::models::{Cart, CartItem, NewOrder, NewProduct, Order, OrderItem, Product, ShippingAddress};

use super::{CommerceStore, StoreError};

/// Embedded migrations for the commerce schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// `PostgreSQL` implementation of [`CommerceStore`].
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (health checks, CLI tooling).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    image: String,
    category: String,
    stock: i32,
    sizes: Vec<String>,
    colors: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            category: row.category,
            stock: row.stock,
            sizes: row.sizes,
            colors: row.colors,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<CartItem>>,
    total_price: Decimal,
    next_item_id: i32,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            total_price: row.total_price,
            next_item_id: row.next_item_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    shipping_address: Json<ShippingAddress>,
    shipping_method: String,
    total_amount: Decimal,
    payment_status: String,
    paid_at: Option<DateTime<Utc>>,
    delivery_status: String,
    delivered_at: Option<DateTime<Utc>>,
    status: String,
    version: i64,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, StoreError> {
        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            items: self.items.0,
            shipping_address: self.shipping_address.0,
            shipping_method: parse_stored(&self.shipping_method, "shipping_method")?,
            total_amount: self.total_amount,
            payment_status: parse_stored(&self.payment_status, "payment_status")?,
            paid_at: self.paid_at,
            delivery_status: parse_stored(&self.delivery_status, "delivery_status")?,
            delivered_at: self.delivered_at,
            status: parse_stored(&self.status, "status")?,
            version: self.version,
            created_at: self.created_at,
        })
    }
}

/// Parse a `TEXT`-stored enum, mapping bad values to `DataCorruption`.
fn parse_stored<T: FromStr<Err = String>>(value: &str, column: &str) -> Result<T, StoreError> {
    value
        .parse()
        .map_err(|e| StoreError::DataCorruption(format!("invalid {column} in database: {e}")))
}

const CART_COLUMNS: &str =
    "id, user_id, items, total_price, next_item_id, version, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_address, shipping_method, total_amount, \
     payment_status, paid_at, delivery_status, delivered_at, status, version, created_at";

#[async_trait]
impl CommerceStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, image, category, stock, sizes, colors, \
             created_at, updated_at \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, image, category, stock, sizes, colors, \
             created_at, updated_at \
             FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, description, price, image, category, stock, sizes, colors) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, name, description, price, image, category, stock, sizes, colors, \
                       created_at, updated_at",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.sizes)
        .bind(&product.colors)
        .fetch_one(&self.pool)
        .await?;

        Ok(Product::from(row))
    }

    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn get_or_create_cart(&self, user_id: UserId) -> Result<Cart, StoreError> {
        // The unique index on user_id makes this race-safe: concurrent
        // first-access inserts collapse into one row.
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        self.find_cart_by_user(user_id).await?.ok_or_else(|| {
            StoreError::DataCorruption(format!("cart missing after upsert for user {user_id}"))
        })
    }

    async fn save_cart(&self, cart: &Cart) -> Result<Cart, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "UPDATE carts \
             SET items = $1, total_price = $2, next_item_id = $3, \
                 version = version + 1, updated_at = now() \
             WHERE id = $4 AND version = $5 \
             RETURNING {CART_COLUMNS}"
        ))
        .bind(Json(&cart.items))
        .bind(cart.total_price)
        .bind(cart.next_item_id)
        .bind(cart.id)
        .bind(cart.version)
        .fetch_optional(&self.pool)
        .await?;

        // Carts are never deleted, so a missed predicate means the version
        // moved underneath us.
        row.map(Cart::from).ok_or(StoreError::VersionConflict)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
             (user_id, items, shipping_address, shipping_method, total_amount) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id)
        .bind(Json(&order.items))
        .bind(Json(&order.shipping_address))
        .bind(order.shipping_method.to_string())
        .bind(order.total_amount)
        .fetch_one(&self.pool)
        .await?;

        row.into_order()
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list_orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn save_order(&self, order: &Order) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders \
             SET payment_status = $1, paid_at = $2, delivery_status = $3, \
                 delivered_at = $4, status = $5, version = version + 1 \
             WHERE id = $6 AND version = $7 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.payment_status.to_string())
        .bind(order.paid_at)
        .bind(order.delivery_status.to_string())
        .bind(order.delivered_at)
        .bind(order.status.to_string())
        .bind(order.id)
        .bind(order.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_order(),
            // Orders are never deleted, so a missed predicate normally means
            // the version moved; re-check to keep NotFound for bogus IDs.
            None => {
                if self.find_order(order.id).await?.is_some() {
                    Err(StoreError::VersionConflict)
                } else {
                    Err(StoreError::NotFound)
                }
            }
        }
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| UserId::new(r.get::<i32, _>("user_id"))))
    }

    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id) VALUES ($1, $2) \
             ON CONFLICT (token) DO UPDATE SET user_id = EXCLUDED.user_id",
        )
        .bind(token)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL set");
        let pool = create_pool(&secrecy::SecretString::from(url))
            .await
            .expect("connect");
        MIGRATOR.run(&pool).await.expect("migrate");
        PgStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
    async fn test_cart_roundtrip_and_cas() {
        let store = connect().await;
        let user = UserId::new(910_001);

        let product = store
            .insert_product(NewProduct {
                name: "CAS Tee".to_owned(),
                description: String::new(),
                price: Decimal::from(40),
                image: "/img/cas.jpg".to_owned(),
                category: "Tops".to_owned(),
                stock: 3,
                sizes: vec!["M".to_owned()],
                colors: vec![],
            })
            .await
            .expect("product");

        let mut cart = store.get_or_create_cart(user).await.expect("cart");
        let stale = cart.clone();

        cart.add_item(&product, 2, Some("M".to_owned()), None);
        let saved = store.save_cart(&cart).await.expect("save");
        assert_eq!(saved.version, cart.version + 1);
        assert_eq!(saved.total_price, Decimal::from(80));

        let err = store.save_cart(&stale).await.expect_err("stale");
        assert!(matches!(err, StoreError::VersionConflict));
    }
}
