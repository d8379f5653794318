//! Audit queries: read-only projections over the ledger.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockbook_core::DomainResult;
use stockbook_infra::LedgerStore;
use stockbook_inventory::{
    aggregate_by_action, aggregate_by_date, ActionTotals, DailyTotals, LogEntry, Product,
    ProductId,
};

/// A product with its full ordered log history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductHistory {
    pub product: Product,
    /// Ordered by `date` ascending, ties broken by insertion order.
    pub logs: Vec<LogEntry>,
}

/// Read side of the ledger. Pure reads; nothing here can change state.
#[derive(Debug, Clone)]
pub struct AuditQuery<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> AuditQuery<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn product_with_history(&self, id: ProductId) -> DomainResult<ProductHistory> {
        let (product, logs) = self.store.history(id)?;
        Ok(ProductHistory { product, logs })
    }

    /// Total added vs removed over the product's whole history.
    pub fn action_totals(&self, id: ProductId) -> DomainResult<ActionTotals> {
        let (_, logs) = self.store.history(id)?;
        Ok(aggregate_by_action(&logs))
    }

    /// Per-day inflow/outflow series, ascending, one record per date.
    pub fn daily_totals(&self, id: ProductId) -> DomainResult<Vec<DailyTotals>> {
        let (_, logs) = self.store.history(id)?;
        Ok(aggregate_by_date(&logs))
    }
}
