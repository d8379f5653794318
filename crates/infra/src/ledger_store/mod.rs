//! Ledger store: durable, consistent holder of products and their logs.

mod in_memory;

pub use in_memory::InMemoryLedgerStore;

use stockbook_core::{Actor, DomainResult, ExpectedVersion};
use stockbook_inventory::{LogEntry, NewProduct, Product, ProductId, StockMutation};

/// Storage contract for products and their append-only stock ledgers.
///
/// The store is the only component allowed to commit state: a mutation's
/// stock update and log append happen inside one `apply_mutation` call, as
/// one atomic unit per product. There is deliberately no standalone
/// "append log" operation that could desynchronize the cached stock from
/// the log sum.
///
/// Concurrency contract:
/// - at most one in-flight mutation per product (per-product mutual
///   exclusion); different products proceed independently
/// - reads observe either the whole pre- or whole post-mutation state
/// - a failed call leaves the product and its ledger unchanged
pub trait LedgerStore: Send + Sync {
    /// Validate and persist a new product. Stock starts at the supplied
    /// positive initial quantity.
    fn create_product(&self, new: NewProduct) -> DomainResult<Product>;

    /// Fetch a product by id.
    fn get(&self, id: ProductId) -> DomainResult<Product>;

    /// All live products, in creation order (stable within a store).
    fn list(&self) -> DomainResult<Vec<Product>>;

    /// Edit name/category, recording `actor` as `last_updated_by`.
    fn update_metadata(
        &self,
        id: ProductId,
        name: &str,
        category: &str,
        actor: Actor,
    ) -> DomainResult<Product>;

    /// Soft-delete a product. The log history is retained for audit
    /// integrity, but the product disappears from every read path.
    fn delete(&self, id: ProductId) -> DomainResult<()>;

    /// Validate and commit a stock mutation: on success the stock update and
    /// the appended [`LogEntry`] are persisted together, atomically.
    ///
    /// `expected` is checked against the product's version before the
    /// mutation is handled; a mismatch fails with `Conflict` and no effect.
    fn apply_mutation(
        &self,
        id: ProductId,
        mutation: StockMutation,
        expected: ExpectedVersion,
    ) -> DomainResult<(Product, LogEntry)>;

    /// Product plus its full log history, ordered by `date` ascending
    /// (ties broken by insertion order).
    fn history(&self, id: ProductId) -> DomainResult<(Product, Vec<LogEntry>)>;
}
