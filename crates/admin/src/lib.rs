//! Trendora Admin - back-office order management API.
//!
//! This crate serves the administrative JSON API on port 3001: listing and
//! inspecting orders across all users and driving their lifecycle (payment
//! confirmation, delivery confirmation, workflow status transitions).
//!
//! Every route requires the static admin bearer token. The storefront
//! binary has no access to these operations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
