//! Domain error taxonomy.
//!
//! Every failure surfaces to the caller as a distinct, typed outcome; the
//! HTTP layers map these onto status codes. Nothing is swallowed inside the
//! cart/order logic except the deliberately permissive remove-missing-item
//! behavior, which is a designed no-op rather than a suppressed error.

use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by the cart and order services.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// A referenced product, cart, item, or order is absent (or not owned by
    /// the requesting user - ownership failures are indistinguishable from
    /// absence on purpose).
    #[error("not found: {0}")]
    NotFound(String),

    /// A required field is missing/invalid or a lifecycle transition is not
    /// allowed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Concurrent mutations exhausted the optimistic-concurrency retries.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The underlying record store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
