use std::sync::Arc;

use vitrine_app::{Config, load_catalog, observability};
use vitrine_catalog::CatalogClient;
use vitrine_store::{SqliteCartStorage, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config = Config::from_env();
    let client = CatalogClient::new(&config.api_base)?;

    let db_path = config.db_path()?;
    let storage = Arc::new(SqliteCartStorage::open(&db_path).await?);

    let store = Store::new(storage);
    store.rehydrate().await;
    tracing::info!(cart_units = store.cart_count(), "cart rehydrated");

    load_catalog(&store, &client).await;

    match store.error() {
        Some(error) => tracing::error!(%error, "catalog load failed"),
        None => tracing::info!(
            products = store.products().len(),
            categories = store.categories().len(),
            "catalog loaded"
        ),
    }

    Ok(())
}
