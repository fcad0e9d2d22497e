//! `vitrine-store`
//!
//! **Responsibility:** the process-wide storefront state container.
//!
//! This crate provides:
//! - [`Store`], shared observable state (catalog snapshot, filters, flags,
//!   cart) with mutation operations and derived-value queries
//! - change notification for UI consumers ([`Store::subscribe`])
//! - the cart persistence port ([`CartStorage`]) with a SQLite-backed
//!   implementation and an in-memory test double
//!
//! Only the cart is durable: catalog and filter state reset on every
//! launch, the cart survives restarts.

pub mod bus;
pub mod sqlite;
pub mod storage;
pub mod store;

pub use bus::{StoreEvent, Subscription};
pub use sqlite::{SqliteCartStorage, default_db_path};
pub use storage::{CartSnapshot, CartStorage, MemoryCartStorage, SCHEMA_VERSION, StorageError};
pub use store::{CatalogSnapshot, LoadSeq, Store};
