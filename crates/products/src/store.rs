//! In-memory catalog store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use shopdesk_core::{DomainError, DomainResult, Entity};

use crate::product::{NewProduct, Price, Product, ProductId};

/// Aggregate view over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_count: usize,
    /// Absent when the catalog is empty (an average of nothing is undefined).
    pub average_price: Option<Price>,
}

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    last_id: u64,
}

/// Process-local product catalog.
///
/// One `RwLock` guards the container: inserts are serialized, reads clone a
/// consistent snapshot. Identifiers come from a monotonic counter and are
/// never reused for the lifetime of the store.
#[derive(Debug, Default)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `products`, in order.
    pub fn seeded<I>(products: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = NewProduct>,
    {
        let store = Self::new();
        for product in products {
            store.insert(product)?;
        }
        Ok(store)
    }

    pub fn insert(&self, product: NewProduct) -> DomainResult<ProductId> {
        product.validate()?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.last_id += 1;
        let id = ProductId::new(inner.last_id);
        let product = Product::from_new(id, product);
        tracing::debug!(product_id = %id, category = %product.category(), "product inserted");
        inner.products.insert(product.id(), product);
        Ok(id)
    }

    /// All products in identifier (insertion) order.
    pub fn list_all(&self) -> Vec<Product> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.products.values().cloned().collect()
    }

    pub fn find_by_id(&self, id: ProductId) -> DomainResult<Product> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn stats(&self) -> CatalogStats {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        CatalogStats {
            total_count: inner.products.len(),
            average_price: Price::mean(inner.products.values().map(Product::price)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a seed document: a JSON array of `{name, price, category, in_stock?}`.
pub fn parse_seed(json: &str) -> DomainResult<Vec<NewProduct>> {
    serde_json::from_str(json).map_err(|e| DomainError::validation("seed", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_product(name: &str, price: f64, category: &str) -> NewProduct {
        NewProduct::new(name, Price::from_major(price).unwrap(), category)
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = CatalogStore::new();
        assert!(store.list_all().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn insert_then_find_returns_equal_product() {
        let store = CatalogStore::new();
        let id = store.insert(new_product("Notebook", 4.5, "Stationery")).unwrap();

        let fetched = store.find_by_id(id).unwrap();
        assert_eq!(fetched.id(), id);
        assert_eq!(fetched.name(), "Notebook");
        assert_eq!(fetched.price(), Price::from_major(4.5).unwrap());
        assert_eq!(fetched.category(), "Stationery");
        assert!(fetched.in_stock());
    }

    #[test]
    fn find_missing_product_is_not_found() {
        let store = CatalogStore::new();
        assert!(matches!(
            store.find_by_id(ProductId::new(999)),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn insert_rejects_blank_name_without_consuming_an_id() {
        let store = CatalogStore::new();
        assert!(store.insert(new_product("  ", 1.0, "Test")).is_err());
        let id = store.insert(new_product("Pen", 1.2, "Stationery")).unwrap();
        assert_eq!(id, ProductId::new(1));
    }

    #[test]
    fn list_all_keeps_insertion_order() {
        let store = CatalogStore::new();
        store.insert(new_product("A", 10.0, "Test")).unwrap();
        store.insert(new_product("B", 20.0, "Test")).unwrap();
        let names: Vec<_> = store.list_all().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn stats_report_count_and_average() {
        let store = CatalogStore::new();
        assert_eq!(
            store.stats(),
            CatalogStats {
                total_count: 0,
                average_price: None
            }
        );

        store.insert(new_product("A", 10.0, "Test")).unwrap();
        store.insert(new_product("B", 20.0, "Test").with_in_stock(false)).unwrap();
        let stats = store.stats();
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.average_price, Some(Price::from_major(15.0).unwrap()));
    }

    #[test]
    fn seed_parses_and_populates_store() {
        let seed = parse_seed(
            r#"[
                {"name": "Ноутбук", "price": 55000, "category": "Электроника"},
                {"name": "Ручка", "price": 1.2, "category": "Канцтовары", "in_stock": false}
            ]"#,
        )
        .unwrap();
        let store = CatalogStore::seeded(seed).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.find_by_id(ProductId::new(2)).unwrap().in_stock());
    }

    #[test]
    fn seed_rejects_negative_price() {
        let err = parse_seed(r#"[{"name": "X", "price": -1, "category": "Y"}]"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn concurrent_inserts_assign_unique_ids() {
        let store = Arc::new(CatalogStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            store.insert(new_product(&format!("p{t}-{i}"), 1.0, "Test")).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<ProductId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(store.len(), 200);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every insert yields a fresh id that resolves to an equal product.
            #[test]
            fn inserted_products_round_trip_through_find(
                items in proptest::collection::vec(
                    (
                        "[A-Za-zА-Яа-я][A-Za-zА-Яа-я0-9 ]{0,30}",
                        0u64..10_000_000,
                        "[A-Za-zА-Яа-я]{1,20}",
                        any::<bool>(),
                    ),
                    1..30,
                )
            ) {
                let store = CatalogStore::new();
                let mut seen = std::collections::HashSet::new();
                for (name, units, category, in_stock) in items {
                    let price = Price::from_minor_units(units);
                    let new = NewProduct::new(name.clone(), price, category.clone())
                        .with_in_stock(in_stock);
                    let id = store.insert(new).unwrap();
                    prop_assert!(seen.insert(id));

                    let found = store.find_by_id(id).unwrap();
                    prop_assert_eq!(found.name(), name.trim());
                    prop_assert_eq!(found.price().minor_units(), units);
                    prop_assert_eq!(found.category(), category.as_str());
                    prop_assert_eq!(found.in_stock(), in_stock);
                }
            }
        }
    }
}
