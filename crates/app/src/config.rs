//! Process configuration from the environment.

use std::path::PathBuf;

/// Default remote catalog endpoint.
pub const DEFAULT_API_BASE: &str = "https://fakestoreapi.com";

/// Runtime configuration for the storefront shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base address of the remote catalog API.
    pub api_base: String,
    /// Override for the cart database directory; `None` uses the OS app
    /// data directory.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Read configuration from `VITRINE_API_BASE` and `VITRINE_DATA_DIR`,
    /// falling back to defaults.
    pub fn from_env() -> Self {
        let api_base = std::env::var("VITRINE_API_BASE").unwrap_or_else(|_| {
            tracing::debug!("VITRINE_API_BASE not set; using {DEFAULT_API_BASE}");
            DEFAULT_API_BASE.to_string()
        });

        let data_dir = std::env::var_os("VITRINE_DATA_DIR").map(PathBuf::from);

        Self { api_base, data_dir }
    }

    /// Where the cart database lives.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join("store.db")),
            None => vitrine_store::default_db_path(),
        }
    }
}
