//! Product catalog types.
//!
//! The catalog is read-mostly: cart and order flows resolve products by ID,
//! while writes happen only through management tooling (the CLI seeder).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trendora_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Longer marketing copy.
    pub description: String,
    /// Unit price in the store currency. Non-negative.
    pub price: Decimal,
    /// Image reference (URL or asset path).
    pub image: String,
    /// Category label (e.g., "Jackets").
    pub category: String,
    /// Units on hand. Informational only - no reservation happens here.
    pub stock: i32,
    /// Available sizes, empty when the product is unsized.
    pub sizes: Vec<String>,
    /// Available colors.
    pub colors: Vec<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}
