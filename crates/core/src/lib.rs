//! `vitrine-core` — storefront domain building blocks.
//!
//! This crate contains **pure domain** types and rules (no IO, no HTTP, no
//! storage): the catalog product shape, the shopping cart with its
//! quantity invariants, and the visible-product derivation.

pub mod cart;
pub mod filter;
pub mod product;

pub use cart::{Cart, CartLine};
pub use filter::visible_products;
pub use product::{Product, ProductId, Rating};
