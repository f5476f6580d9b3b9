//! Trendora Storefront - customer-facing commerce API.
//!
//! This crate serves the public JSON API on port 3000: catalog reads, the
//! authenticated cart, and checkout. Requests authenticate with a bearer
//! session token; the token maps to a user through the commerce store's
//! session table (issuance belongs to the external auth collaborator).
//!
//! This binary never mutates order status fields. Payment, delivery, and
//! workflow transitions are an administrative capability and live in the
//! admin binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
