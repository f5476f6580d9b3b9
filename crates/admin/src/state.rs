//! Application state shared across handlers.

use std::sync::Arc;

use trendora_commerce::OrderService;
use trendora_commerce::store::CommerceStore;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn CommerceStore>,
    orders: OrderService,
}

impl AppState {
    /// Create application state over a record store.
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn CommerceStore>) -> Self {
        let orders = OrderService::new(Arc::clone(&store));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                orders,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CommerceStore> {
        &self.inner.store
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
