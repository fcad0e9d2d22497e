//! `vitrine-catalog`
//!
//! **Responsibility:** read-only access to the remote product catalog.
//!
//! This crate provides:
//! - [`CatalogClient`], an HTTP client for the catalog REST endpoints
//! - [`CatalogApi`], the trait seam callers depend on
//! - [`CatalogError`], the failure taxonomy for remote calls
//!
//! The client does not retry and does not cache; callers decide how to
//! react to failures.

pub mod client;
pub mod error;

pub use client::{CatalogApi, CatalogClient};
pub use error::CatalogError;
