//! Catalog load orchestration.

use vitrine_catalog::CatalogApi;
use vitrine_store::{CatalogSnapshot, Store};

/// Load products and categories concurrently and apply the joined result.
///
/// Join semantics: both fetches must succeed for the catalog to be
/// replaced; if either fails the store keeps its previous catalog and
/// records the error description. A response belonging to a load that
/// has since been superseded is dropped by the store.
pub async fn load_catalog(store: &Store, catalog: &dyn CatalogApi) {
    let seq = store.begin_load();

    let outcome = match tokio::try_join!(
        catalog.fetch_all_products(),
        catalog.fetch_categories()
    ) {
        Ok((products, categories)) => Ok(CatalogSnapshot {
            products,
            categories,
        }),
        Err(err) => {
            tracing::error!("catalog load failed: {err}");
            Err(err.to_string())
        }
    };

    store.complete_load(seq, outcome);
}
