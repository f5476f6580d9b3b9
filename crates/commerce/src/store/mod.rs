//! The record-store port.
//!
//! Every aggregate is persisted as a single record (`find-by-key`, `create`,
//! `save`), each operation atomic at single-record granularity. Two backends
//! exist:
//!
//! - [`memory::MemoryStore`] - process-local, used by tests, the in-process
//!   integration suite, and local development
//! - [`postgres::PgStore`] - `PostgreSQL` via sqlx; line items are `JSONB`
//!   documents on their aggregate row
//!
//! # Concurrency contract
//!
//! `save_cart` and `save_order` are compare-and-swaps on the aggregate's
//! `version` field: the save succeeds only when the stored version still
//! equals the version the caller read, otherwise it fails with
//! [`StoreError::VersionConflict`] and the caller re-reads and retries.
//! `get_or_create_cart` must be race-safe for concurrent first access by the
//! same user; backends enforce per-user cart uniqueness.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use trendora_core::{OrderId, ProductId, UserId};

use crate::models::{Cart, NewOrder, NewProduct, Order, Product};

pub use memory::MemoryStore;
pub use postgres::{MIGRATOR, PgStore, create_pool};

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// The record changed since it was read (optimistic-concurrency check
    /// failed).
    #[error("version conflict")]
    VersionConflict,

    /// Constraint violation (e.g., duplicate cart for a user).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations used by the commerce services.
#[async_trait]
pub trait CommerceStore: Send + Sync {
    /// Readiness probe for the backing storage.
    async fn ping(&self) -> Result<(), StoreError>;

    // --- Catalog ---

    /// Look up a product by ID.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// List the full catalog.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert a new catalog product (management tooling only).
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    // --- Carts ---

    /// Find the user's cart, if one exists.
    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, StoreError>;

    /// Return the user's cart, creating an empty one when absent.
    ///
    /// Safe under concurrent first access: at most one cart per user is ever
    /// created.
    async fn get_or_create_cart(&self, user_id: UserId) -> Result<Cart, StoreError>;

    /// Persist a mutated cart.
    ///
    /// Compare-and-swap on `cart.version`: fails with
    /// [`StoreError::VersionConflict`] when the stored version differs.
    /// On success returns the stored cart with its bumped version.
    async fn save_cart(&self, cart: &Cart) -> Result<Cart, StoreError>;

    // --- Orders ---

    /// Persist a new order snapshot with default status fields.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Look up an order by ID.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// All orders for a user, newest first.
    async fn list_orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    /// All orders across users, newest first (administrative).
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Persist an order's mutable status fields.
    ///
    /// Compare-and-swap on `order.version`, same contract as [`Self::save_cart`]:
    /// fails with [`StoreError::VersionConflict`] when the stored version
    /// differs, so a stale snapshot can never overwrite a confirmed state.
    /// Fails with [`StoreError::NotFound`] when the order does not exist.
    /// On success returns the stored order with its bumped version.
    async fn save_order(&self, order: &Order) -> Result<Order, StoreError>;

    // --- Sessions ---

    /// Resolve a session token to the authenticated user.
    async fn find_session_user(&self, token: &str) -> Result<Option<UserId>, StoreError>;

    /// Record a session token for a user (issued by the external auth
    /// collaborator; minted locally only by the CLI and tests).
    async fn insert_session(&self, token: &str, user_id: UserId) -> Result<(), StoreError>;
}
