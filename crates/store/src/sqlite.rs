//! SQLite-backed cart storage.
//!
//! A single-row key-value table under the OS app data directory. The
//! payload column holds the JSON-encoded [`CartSnapshot`]; `saved_at`
//! is duplicated into its own column for inspection with plain SQL.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};

use crate::storage::{CartSnapshot, CartStorage, StorageError};

/// Fixed key for the single cart record.
const CART_KEY: &str = "cart";

/// SQLite-backed durable storage for the cart snapshot.
#[derive(Debug, Clone)]
pub struct SqliteCartStorage {
    pool: SqlitePool,
}

impl SqliteCartStorage {
    /// Open the database at `path`, creating the file and its parent
    /// directory if missing.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create storage directory at {parent:?}"))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open cart database at {path:?}"))?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open a private in-memory database (tests).
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .context("failed to open in-memory cart database")?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cart_snapshot (
                key      TEXT NOT NULL PRIMARY KEY,
                data     TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .context("failed to create cart_snapshot table")?;

        Ok(())
    }
}

#[async_trait]
impl CartStorage for SqliteCartStorage {
    async fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let row = sqlx::query("SELECT data FROM cart_snapshot WHERE key = ?1")
            .bind(CART_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let data: String = row
            .try_get("data")
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let snapshot =
            serde_json::from_str(&data).map_err(|e| StorageError::Serde(e.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let data =
            serde_json::to_string(snapshot).map_err(|e| StorageError::Serde(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO cart_snapshot (key, data, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                data = excluded.data,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(CART_KEY)
        .bind(&data)
        .bind(snapshot.saved_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}

/// Resolve the default database path: `{app_data_dir}/vitrine/store.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory")?;

    let mut dir = base;
    dir.push("vitrine");
    dir.push("store.db");
    Ok(dir)
}
