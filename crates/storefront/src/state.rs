//! Application state shared across handlers.

use std::sync::Arc;

use trendora_commerce::store::CommerceStore;
use trendora_commerce::{CartService, OrderService};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the record store
/// and the commerce services built over it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn CommerceStore>,
    carts: CartService,
    orders: OrderService,
}

impl AppState {
    /// Create application state over a record store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn CommerceStore>) -> Self {
        let carts = CartService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                carts,
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CommerceStore> {
        &self.inner.store
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
