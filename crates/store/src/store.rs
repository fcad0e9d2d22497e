//! Process-wide store state container.

use std::sync::{Arc, Mutex, MutexGuard};

use vitrine_core::{Cart, CartLine, Product, ProductId, visible_products};

use crate::bus::{ChangeBus, StoreEvent, Subscription};
use crate::storage::{CartSnapshot, CartStorage, SCHEMA_VERSION};

/// Catalog payload applied when a load completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
}

/// Monotonic token identifying one catalog load.
///
/// Issued by [`Store::begin_load`]; a completion carrying a token older
/// than the latest issued one is stale and gets dropped, so a slow
/// response can never overwrite a fresher one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadSeq(u64);

#[derive(Debug, Default)]
struct StoreState {
    products: Vec<Product>,
    categories: Vec<String>,
    cart: Cart,
    selected_category: Option<String>,
    search_query: String,
    is_loading: bool,
    error: Option<String>,
    issued_loads: u64,
}

/// Shared, observable state for the storefront UI.
///
/// One instance exists per process, constructed at startup and handed by
/// `Arc` to every consumer. In-memory state is authoritative: cart
/// mutations commit under the lock first, then the snapshot is written to
/// durable storage; a write failure is logged and never surfaced to the
/// caller. Derived values are recomputed from current state on every
/// call, never cached.
pub struct Store {
    state: Mutex<StoreState>,
    storage: Arc<dyn CartStorage>,
    bus: ChangeBus,
}

impl Store {
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            storage,
            bus: ChangeBus::default(),
        }
    }

    /// Restore the cart from durable storage.
    ///
    /// Runs once at startup, before the store is handed to consumers. A
    /// missing record, unparseable payload, stale envelope version, or a
    /// backend read error all degrade to the empty cart.
    pub async fn rehydrate(&self) {
        let snapshot = match self.storage.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!("failed to read persisted cart, starting empty: {err}");
                return;
            }
        };

        if snapshot.version != SCHEMA_VERSION {
            tracing::warn!(
                stored = snapshot.version,
                expected = SCHEMA_VERSION,
                "persisted cart has an unknown schema version, starting empty"
            );
            return;
        }

        self.lock().cart = snapshot.cart;
        self.bus.publish(StoreEvent::CartChanged);
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn persist(&self, snapshot: CartSnapshot) {
        if let Err(err) = self.storage.save(&snapshot).await {
            tracing::error!("failed to persist cart: {err}");
        }
    }

    // --- catalog & filter mutations ------------------------------------

    pub fn set_products(&self, products: Vec<Product>) {
        self.lock().products = products;
        self.bus.publish(StoreEvent::CatalogReplaced);
    }

    pub fn set_categories(&self, categories: Vec<String>) {
        self.lock().categories = categories;
        self.bus.publish(StoreEvent::CatalogReplaced);
    }

    pub fn set_selected_category(&self, category: Option<String>) {
        self.lock().selected_category = category;
        self.bus.publish(StoreEvent::FilterChanged);
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.lock().search_query = query.into();
        self.bus.publish(StoreEvent::FilterChanged);
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().is_loading = loading;
        self.bus.publish(StoreEvent::LoadingChanged);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.lock().error = error;
        self.bus.publish(StoreEvent::ErrorChanged);
    }

    // --- load lifecycle -------------------------------------------------

    /// Start a catalog load: flips the loading flag, clears the error,
    /// and issues the sequence token the completion must present.
    pub fn begin_load(&self) -> LoadSeq {
        let seq = {
            let mut state = self.lock();
            state.issued_loads += 1;
            state.is_loading = true;
            state.error = None;
            LoadSeq(state.issued_loads)
        };
        self.bus.publish(StoreEvent::LoadingChanged);
        seq
    }

    /// Finish the load identified by `seq`.
    ///
    /// Stale completions (a newer load has been issued since) are dropped
    /// without touching state. Otherwise the catalog is replaced
    /// wholesale on success, or the error description recorded on
    /// failure, and the loading flag cleared.
    pub fn complete_load(&self, seq: LoadSeq, outcome: Result<CatalogSnapshot, String>) {
        let events = {
            let mut state = self.lock();
            if seq.0 < state.issued_loads {
                tracing::debug!(
                    completed = seq.0,
                    latest = state.issued_loads,
                    "dropping stale catalog load"
                );
                return;
            }

            state.is_loading = false;
            match outcome {
                Ok(snapshot) => {
                    state.products = snapshot.products;
                    state.categories = snapshot.categories;
                    [StoreEvent::CatalogReplaced, StoreEvent::LoadingChanged]
                }
                Err(message) => {
                    state.error = Some(message);
                    [StoreEvent::ErrorChanged, StoreEvent::LoadingChanged]
                }
            }
        };

        for event in events {
            self.bus.publish(event);
        }
    }

    // --- cart mutations -------------------------------------------------
    //
    // Each commits in memory under the lock, publishes, then writes the
    // snapshot to storage.

    /// Add one unit of `product`: increments the existing line or appends
    /// a new one with quantity 1.
    pub async fn add_to_cart(&self, product: Product) {
        let snapshot = {
            let mut state = self.lock();
            state.cart.add(product);
            CartSnapshot::new(state.cart.clone())
        };
        self.bus.publish(StoreEvent::CartChanged);
        self.persist(snapshot).await;
    }

    /// Remove the line for `id`; silently a no-op if absent.
    pub async fn remove_from_cart(&self, id: ProductId) {
        let snapshot = {
            let mut state = self.lock();
            state.cart.remove(id);
            CartSnapshot::new(state.cart.clone())
        };
        self.bus.publish(StoreEvent::CartChanged);
        self.persist(snapshot).await;
    }

    /// Set the quantity for `id`; `quantity <= 0` behaves as removal, an
    /// absent id is a no-op.
    pub async fn update_quantity(&self, id: ProductId, quantity: i64) {
        let snapshot = {
            let mut state = self.lock();
            state.cart.set_quantity(id, quantity);
            CartSnapshot::new(state.cart.clone())
        };
        self.bus.publish(StoreEvent::CartChanged);
        self.persist(snapshot).await;
    }

    /// Empty the cart.
    pub async fn clear_cart(&self) {
        let snapshot = {
            let mut state = self.lock();
            state.cart.clear();
            CartSnapshot::new(state.cart.clone())
        };
        self.bus.publish(StoreEvent::CartChanged);
        self.persist(snapshot).await;
    }

    // --- derived queries ------------------------------------------------

    /// Sum of `price * quantity` over the cart; 0 when empty.
    pub fn total_price(&self) -> f64 {
        self.lock().cart.total_price()
    }

    /// Total units in the cart (not the number of lines).
    pub fn cart_count(&self) -> i64 {
        self.lock().cart.unit_count()
    }

    /// Products passing the current category and search filters, in
    /// catalog order.
    pub fn filtered_products(&self) -> Vec<Product> {
        let state = self.lock();
        visible_products(
            &state.products,
            state.selected_category.as_deref(),
            &state.search_query,
        )
    }

    // --- snapshot accessors ----------------------------------------------

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.lock().categories.clone()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.lock().cart.lines().to_vec()
    }

    pub fn selected_category(&self) -> Option<String> {
        self.lock().selected_category.clone()
    }

    pub fn search_query(&self) -> String {
        self.lock().search_query.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryCartStorage, StorageError};
    use async_trait::async_trait;
    use vitrine_core::Rating;

    fn test_product(id: u64, price: f64, category: &str, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price,
            description: format!("description of {title}"),
            category: category.to_string(),
            image: format!("https://img.example/{id}.png"),
            rating: Rating {
                rate: 4.0,
                count: 5,
            },
        }
    }

    fn store_with_memory() -> (Arc<MemoryCartStorage>, Store) {
        let storage = Arc::new(MemoryCartStorage::new());
        let store = Store::new(storage.clone());
        (storage, store)
    }

    #[tokio::test]
    async fn add_remove_update_scenario() {
        let (_, store) = store_with_memory();
        let p1 = test_product(1, 19.99, "electronics", "Wireless Phone");
        let p2 = test_product(2, 7.50, "accessories", "Phone Case");

        store.add_to_cart(p1.clone()).await;
        store.add_to_cart(p1.clone()).await;
        store.add_to_cart(p2.clone()).await;

        let lines = store.cart_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 1);
        assert_eq!(store.cart_count(), 3);
        assert_eq!(store.total_price(), 2.0 * p1.price + p2.price);

        store.update_quantity(p1.id, 5).await;
        assert_eq!(store.cart_count(), 6);

        store.update_quantity(p2.id, 0).await;
        assert_eq!(store.cart_lines().len(), 1);

        store.remove_from_cart(ProductId::new(42)).await;
        assert_eq!(store.cart_lines().len(), 1);

        store.clear_cart().await;
        assert!(store.cart_lines().is_empty());
        assert_eq!(store.total_price(), 0.0);
    }

    #[tokio::test]
    async fn cart_mutations_write_through_to_storage() {
        let (storage, store) = store_with_memory();

        store
            .add_to_cart(test_product(1, 10.0, "misc", "Widget"))
            .await;

        let stored = storage.load().await.unwrap().unwrap();
        assert_eq!(stored.version, SCHEMA_VERSION);
        assert_eq!(stored.cart.unit_count(), 1);

        store.clear_cart().await;
        let stored = storage.load().await.unwrap().unwrap();
        assert!(stored.cart.is_empty());
    }

    #[tokio::test]
    async fn cart_survives_a_restart() {
        let storage = Arc::new(MemoryCartStorage::new());

        let first = Store::new(storage.clone());
        first
            .add_to_cart(test_product(1, 19.99, "electronics", "Wireless Phone"))
            .await;
        first
            .add_to_cart(test_product(1, 19.99, "electronics", "Wireless Phone"))
            .await;
        first.set_search_query("phone");
        let lines_before = first.cart_lines();
        drop(first);

        let second = Store::new(storage);
        second.rehydrate().await;

        assert_eq!(second.cart_lines(), lines_before);
        // Filters are not persisted; they reset on launch.
        assert_eq!(second.search_query(), "");
    }

    #[tokio::test]
    async fn corrupt_storage_rehydrates_as_empty_cart() {
        let storage = Arc::new(MemoryCartStorage::seeded("{not json at all"));
        let store = Store::new(storage);
        store.rehydrate().await;

        assert!(store.cart_lines().is_empty());
    }

    #[tokio::test]
    async fn unknown_schema_version_rehydrates_as_empty_cart() {
        let mut snapshot = CartSnapshot::new({
            let mut cart = Cart::new();
            cart.add(test_product(1, 5.0, "misc", "Widget"));
            cart
        });
        snapshot.version = SCHEMA_VERSION + 1;
        let raw = serde_json::to_string(&snapshot).unwrap();

        let store = Store::new(Arc::new(MemoryCartStorage::seeded(raw)));
        store.rehydrate().await;

        assert!(store.cart_lines().is_empty());
    }

    #[tokio::test]
    async fn missing_storage_rehydrates_as_empty_cart() {
        let (_, store) = store_with_memory();
        store.rehydrate().await;
        assert!(store.cart_lines().is_empty());
    }

    struct FailingStorage;

    #[async_trait]
    impl CartStorage for FailingStorage {
        async fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }

        async fn save(&self, _snapshot: &CartSnapshot) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn in_memory_cart_is_authoritative_when_persistence_fails() {
        let store = Store::new(Arc::new(FailingStorage));
        store.rehydrate().await;

        store
            .add_to_cart(test_product(1, 10.0, "misc", "Widget"))
            .await;

        assert_eq!(store.cart_count(), 1);
    }

    #[tokio::test]
    async fn filtered_products_compose_category_and_query() {
        let (_, store) = store_with_memory();
        store.set_products(vec![
            test_product(1, 199.99, "electronics", "Wireless Phone"),
            test_product(2, 49.99, "electronics", "Headphones"),
            test_product(3, 9.99, "accessories", "Phone Case"),
        ]);

        store.set_selected_category(Some("electronics".to_string()));
        store.set_search_query("PHONE");

        let ids: Vec<u64> = store.filtered_products().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);

        store.set_selected_category(None);
        store.set_search_query("");
        assert_eq!(store.filtered_products().len(), 3);
    }

    #[test]
    fn begin_load_flips_loading_and_clears_error() {
        let (_, store) = store_with_memory();
        store.set_error(Some("previous failure".to_string()));

        store.begin_load();

        assert!(store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let (_, store) = store_with_memory();

        let older = store.begin_load();
        let newer = store.begin_load();

        store.complete_load(
            older,
            Ok(CatalogSnapshot {
                products: vec![test_product(1, 1.0, "stale", "Stale")],
                categories: vec!["stale".to_string()],
            }),
        );

        // The stale result must not land, and the newer load is still
        // outstanding.
        assert!(store.products().is_empty());
        assert!(store.is_loading());

        store.complete_load(
            newer,
            Ok(CatalogSnapshot {
                products: vec![test_product(2, 2.0, "fresh", "Fresh")],
                categories: vec!["fresh".to_string()],
            }),
        );

        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].id, ProductId::new(2));
        assert!(!store.is_loading());
    }

    #[test]
    fn failed_load_records_the_error_and_keeps_the_catalog() {
        let (_, store) = store_with_memory();
        store.set_products(vec![test_product(1, 1.0, "misc", "Widget")]);

        let seq = store.begin_load();
        store.complete_load(seq, Err("network error: timeout".to_string()));

        assert!(!store.is_loading());
        assert_eq!(store.error().as_deref(), Some("network error: timeout"));
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let (_, store) = store_with_memory();
        let sub = store.subscribe();

        store.add_to_cart(test_product(1, 1.0, "misc", "Widget")).await;
        store.set_search_query("w");

        assert_eq!(sub.try_recv().unwrap(), StoreEvent::CartChanged);
        assert_eq!(sub.try_recv().unwrap(), StoreEvent::FilterChanged);
        assert!(sub.try_recv().is_err());
    }
}
