//! Trendora Core - Shared types library.
//!
//! This crate provides common types used across all Trendora components:
//! - `storefront` - Customer-facing REST API
//! - `admin` - Internal fulfillment API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, plus status and
//!   shipping-method enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
