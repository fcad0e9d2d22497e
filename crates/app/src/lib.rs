//! `vitrine-app`
//!
//! **Responsibility:** thin shell around the storefront library crates.
//!
//! Wires the catalog client, the store container, and durable cart
//! storage together: environment configuration, tracing setup, and the
//! concurrent catalog load the product-list screen performs.

pub mod config;
pub mod loader;
pub mod observability;

pub use config::Config;
pub use loader::load_catalog;
