//! Trendora Commerce - cart and order domain core.
//!
//! This crate owns the business rules of the storefront:
//!
//! - [`models`] - Products, carts, orders and their embedded line items
//! - [`cart`] - The per-user cart aggregate: merge-on-add, absolute quantity
//!   updates, removal, clearing, and total recomputation
//! - [`order`] - Order creation from checkout data plus the fulfillment
//!   lifecycle (payment, delivery, workflow status)
//! - [`pricing`] - Pure functions deriving subtotal/shipping/grand total
//! - [`store`] - The record-store port with in-memory and `PostgreSQL`
//!   backends
//!
//! # Concurrency
//!
//! Cart mutations are read-modify-write cycles. Backends expose an optimistic
//! compare-and-swap on the cart's `version` field; [`cart::CartService`]
//! retries a bounded number of times on conflict so that two racing
//! `add_item` calls for the same user never drop each other's lines.
//! Per-user cart uniqueness is enforced by the storage layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod error;
pub mod models;
pub mod order;
pub mod pricing;
pub mod store;

pub use cart::CartService;
pub use error::CommerceError;
pub use order::OrderService;
