//! In-memory catalog store.
//!
//! Suitable for single-process deployments and tests. Each sweet lives
//! behind its own `RwLock`, so the read-compare-write inside `purchase`
//! holds only that item's lock: operations on item A never block
//! operations on item B, and concurrent purchases against one item are
//! serialized through its lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use sweet_shop_core::SweetId;

use super::{CatalogError, CatalogStore, SweetFilter};
use crate::models::{NewSweet, Sweet, SweetPatch};

type Shared<T> = Arc<RwLock<T>>;

/// In-memory catalog keyed by sweet id.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    // Outer lock guards the map shape only; item state is behind the
    // per-item locks.
    sweets: Shared<HashMap<SweetId, Shared<Sweet>>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the shared handle for one item without holding the map lock
    /// afterwards.
    fn entry(&self, id: SweetId) -> Result<Option<Shared<Sweet>>, CatalogError> {
        let map = self.sweets.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    /// Snapshot every sweet. Each clone is taken under that item's read
    /// lock, so a half-written record is never observed.
    fn snapshot(&self) -> Result<Vec<Sweet>, CatalogError> {
        let entries: Vec<Shared<Sweet>> = {
            let map = self.sweets.read().map_err(poisoned)?;
            map.values().cloned().collect()
        };

        let mut sweets = Vec::with_capacity(entries.len());
        for entry in entries {
            sweets.push(entry.read().map_err(poisoned)?.clone());
        }

        sweets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(sweets)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CatalogError {
    CatalogError::Corrupt("catalog lock poisoned".to_owned())
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn get(&self, id: SweetId) -> Result<Option<Sweet>, CatalogError> {
        match self.entry(id)? {
            Some(entry) => Ok(Some(entry.read().map_err(poisoned)?.clone())),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Sweet>, CatalogError> {
        self.snapshot()
    }

    async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>, CatalogError> {
        let mut sweets = self.snapshot()?;
        sweets.retain(|sweet| filter.matches(sweet));
        Ok(sweets)
    }

    async fn insert(&self, new: NewSweet) -> Result<Sweet, CatalogError> {
        let sweet = Sweet::from_new(new);
        let mut map = self.sweets.write().map_err(poisoned)?;
        map.insert(sweet.id, Arc::new(RwLock::new(sweet.clone())));
        Ok(sweet)
    }

    async fn update(&self, id: SweetId, patch: SweetPatch) -> Result<Sweet, CatalogError> {
        let entry = self.entry(id)?.ok_or(CatalogError::NotFound)?;
        let mut sweet = entry.write().map_err(poisoned)?;
        sweet.apply(patch);
        Ok(sweet.clone())
    }

    async fn delete(&self, id: SweetId) -> Result<(), CatalogError> {
        let mut map = self.sweets.write().map_err(poisoned)?;
        map.remove(&id).map(|_| ()).ok_or(CatalogError::NotFound)
    }

    async fn purchase(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError> {
        let entry = self.entry(id)?.ok_or(CatalogError::NotFound)?;

        // Check and decrement under the item's write lock.
        let mut sweet = entry.write().map_err(poisoned)?;
        if sweet.quantity < amount {
            return Err(CatalogError::InsufficientStock {
                available: sweet.quantity,
            });
        }
        sweet.quantity -= amount;
        sweet.updated_at = chrono::Utc::now();
        Ok(sweet.clone())
    }

    async fn restock(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError> {
        let entry = self.entry(id)?.ok_or(CatalogError::NotFound)?;

        let mut sweet = entry.write().map_err(poisoned)?;
        sweet.quantity = sweet.quantity.saturating_add(amount);
        sweet.updated_at = chrono::Utc::now();
        Ok(sweet.clone())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sweet_shop_core::Category;

    fn new_sweet(name: &str, price: i64, quantity: i64) -> NewSweet {
        NewSweet {
            name: name.to_owned(),
            description: format!("{name} description"),
            category: Category::Traditional,
            price: Decimal::from(price),
            quantity,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Ladoo", 90, 20)).await.unwrap();

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = MemoryCatalog::new();
        assert!(store.get(SweetId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = MemoryCatalog::new();
        let a = store.insert(new_sweet("A", 10, 1)).await.unwrap();
        let b = store.insert(new_sweet("B", 10, 1)).await.unwrap();
        let c = store.insert(new_sweet("C", 10, 1)).await.unwrap();

        let sweets = store.list_all().await.unwrap();
        assert_eq!(sweets.len(), 3);
        assert!(
            sweets
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
        for id in [a.id, b.id, c.id] {
            assert!(sweets.iter().any(|s| s.id == id));
        }
    }

    #[tokio::test]
    async fn test_update_applies_wholesale() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Barfi", 120, 5)).await.unwrap();

        let updated = store
            .update(
                created.id,
                SweetPatch {
                    price: Some(Decimal::from(140)),
                    quantity: Some(8),
                    ..SweetPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::from(140));
        assert_eq!(updated.quantity, 8);
        assert_eq!(updated.name, "Barfi");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryCatalog::new();
        let err = store
            .update(SweetId::new(), SweetPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Jalebi", 60, 12)).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(store.get(created.id).await.unwrap().is_none());

        let err = store.delete(created.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_purchase_decrements() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Peda", 70, 10)).await.unwrap();

        let after = store.purchase(created.id, 4).await.unwrap();
        assert_eq!(after.quantity, 6);
        assert!(after.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_reports_available() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Peda", 70, 3)).await.unwrap();

        let err = store.purchase(created.id, 4).await.unwrap_err();
        match err {
            CatalogError::InsufficientStock { available } => assert_eq!(available, 3),
            other => panic!("unexpected error: {other}"),
        }

        // Failed purchase leaves quantity unchanged.
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.quantity, 3);
    }

    #[tokio::test]
    async fn test_purchase_entire_stock_reaches_zero() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Peda", 70, 5)).await.unwrap();

        let after = store.purchase(created.id, 5).await.unwrap();
        assert_eq!(after.quantity, 0);
    }

    #[tokio::test]
    async fn test_restock_increments() {
        let store = MemoryCatalog::new();
        let created = store.insert(new_sweet("Halwa", 110, 0)).await.unwrap();

        let after = store.restock(created.id, 25).await.unwrap();
        assert_eq!(after.quantity, 25);
    }

    #[tokio::test]
    async fn test_search_filters_and_keeps_order() {
        let store = MemoryCatalog::new();
        store.insert(new_sweet("Cheap", 80, 1)).await.unwrap();
        store.insert(new_sweet("Mid One", 150, 1)).await.unwrap();
        store.insert(new_sweet("Mid Two", 180, 1)).await.unwrap();
        store.insert(new_sweet("Dear", 250, 1)).await.unwrap();

        let filter = SweetFilter {
            min_price: Some(Decimal::from(100)),
            max_price: Some(Decimal::from(200)),
            ..SweetFilter::default()
        };
        let found = store.search(&filter).await.unwrap();

        let mut prices: Vec<Decimal> = found.iter().map(|s| s.price).collect();
        prices.sort_unstable();
        assert_eq!(prices, vec![Decimal::from(150), Decimal::from(180)]);
    }

    #[tokio::test]
    async fn test_concurrent_purchases_never_oversell() {
        let store = Arc::new(MemoryCatalog::new());
        let created = store.insert(new_sweet("Limited", 99, 10)).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let id = created.id;
            tasks.spawn(async move { store.purchase(id, 3).await });
        }

        let mut successes = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap().is_ok() {
                successes += 1;
            }
        }

        // floor(10 / 3) purchases can succeed; stock never goes negative.
        assert_eq!(successes, 3);
        let final_state = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(final_state.quantity, 1);
        assert!(final_state.quantity >= 0);
    }
}
