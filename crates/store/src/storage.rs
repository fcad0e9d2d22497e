//! Cart persistence port.
//!
//! The cart alone is serialized to durable key-value storage after every
//! mutating cart operation, and read back once at startup. Implementations
//! hold exactly one record under a fixed key; every write replaces it
//! wholesale (last write wins).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitrine_core::Cart;

/// Envelope version written with every snapshot. Bump on any change to
/// the persisted shape; readers discard snapshots from other versions.
pub const SCHEMA_VERSION: u32 = 1;

/// Persisted envelope: the cart plus migration metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub cart: Cart,
    pub saved_at: DateTime<Utc>,
}

impl CartSnapshot {
    pub fn new(cart: Cart) -> Self {
        Self {
            version: SCHEMA_VERSION,
            cart,
            saved_at: Utc::now(),
        }
    }
}

/// Durable read/write failure.
///
/// Callers on the rehydration and persist paths degrade on this error
/// (empty cart / log-and-continue); it never aborts the container.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

/// Durable key-value home for the cart snapshot.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the stored snapshot, `None` if nothing was ever written.
    async fn load(&self) -> Result<Option<CartSnapshot>, StorageError>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError>;
}

/// In-memory storage double.
///
/// Holds the raw JSON payload so tests can exercise the corrupt-data
/// path by seeding arbitrary text.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    record: Mutex<Option<String>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage whose record already contains `raw`.
    pub fn seeded(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }

    /// The raw stored payload, if any.
    pub fn raw(&self) -> Option<String> {
        self.record
            .lock()
            .map(|record| record.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let record = self
            .record
            .lock()
            .map_err(|_| StorageError::Backend("storage lock poisoned".to_string()))?;

        let Some(raw) = record.as_ref() else {
            return Ok(None);
        };

        let snapshot =
            serde_json::from_str(raw).map_err(|e| StorageError::Serde(e.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(snapshot).map_err(|e| StorageError::Serde(e.to_string()))?;

        let mut record = self
            .record
            .lock()
            .map_err(|_| StorageError::Backend("storage lock poisoned".to_string()))?;
        *record = Some(raw);
        Ok(())
    }
}
