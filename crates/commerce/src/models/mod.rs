//! Domain models for the commerce core.
//!
//! These are validated domain objects, separate from database row types
//! (row mapping lives in the store backends).

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartItem};
pub use order::{NewOrder, Order, OrderItem, ShippingAddress};
pub use product::{NewProduct, Product};
