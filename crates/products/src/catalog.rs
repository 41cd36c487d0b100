//! Catalog access seam used by the operation executor.

use async_trait::async_trait;

use shopdesk_core::DomainResult;

use crate::product::{NewProduct, Product, ProductId};
use crate::store::CatalogStore;

/// Read/write access to a product catalog.
///
/// Implemented by the in-memory [`CatalogStore`] and by remote catalogs that
/// sit behind a tool subprocess. Remote implementations report transport
/// failures as `DomainError::Unavailable`.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Insert a product and return it with its assigned identifier.
    async fn insert_product(&self, product: NewProduct) -> DomainResult<Product>;

    async fn list_products(&self) -> DomainResult<Vec<Product>>;

    async fn get_product(&self, id: ProductId) -> DomainResult<Product>;
}

#[async_trait]
impl Catalog for CatalogStore {
    async fn insert_product(&self, product: NewProduct) -> DomainResult<Product> {
        let id = self.insert(product)?;
        self.find_by_id(id)
    }

    async fn list_products(&self) -> DomainResult<Vec<Product>> {
        Ok(self.list_all())
    }

    async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        self.find_by_id(id)
    }
}
