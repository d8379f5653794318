//! Product directory: create/read/update/delete product metadata.
//!
//! Independent of stock mutation, but shares the same ledger store so that
//! directory reads always reflect committed stock.

use std::sync::Arc;

use tracing::info;

use stockbook_core::{Actor, DomainResult};
use stockbook_infra::LedgerStore;
use stockbook_inventory::{NewProduct, Product, ProductId};

#[derive(Debug, Clone)]
pub struct ProductDirectory<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> ProductDirectory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a product with a caller-supplied positive initial stock.
    pub fn create(&self, new: NewProduct) -> DomainResult<Product> {
        let product = self.store.create_product(new)?;
        info!(
            product_id = %product.id_typed(),
            name = product.name(),
            initial_stock = product.initial_stock(),
            created_by = %product.created_by(),
            "product created"
        );
        Ok(product)
    }

    pub fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.store.get(id)
    }

    /// All live products, with current stock and actor attribution. Callers
    /// do their own filtering.
    pub fn list(&self) -> DomainResult<Vec<Product>> {
        self.store.list()
    }

    /// Edit name/category; `actor` is recorded as `last_updated_by`.
    pub fn update_metadata(
        &self,
        id: ProductId,
        name: &str,
        category: &str,
        actor: Actor,
    ) -> DomainResult<Product> {
        let product = self.store.update_metadata(id, name, category, actor)?;
        info!(product_id = %id, name = product.name(), "product metadata updated");
        Ok(product)
    }

    /// Soft-delete the product; its audit trail is retained in the store.
    pub fn delete(&self, id: ProductId) -> DomainResult<()> {
        self.store.delete(id)?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}
