//! Stock mutation engine: the sole write path for stock after creation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use stockbook_core::{Actor, DomainError, DomainResult, ExpectedVersion};
use stockbook_infra::LedgerStore;
use stockbook_inventory::{LogEntry, LogEntryId, Product, ProductId, StockAction, StockMutation};

/// Validated boundary input for a mutation: how much and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub amount: u64,
    pub reason: String,
}

/// Applies add/remove mutations through the ledger store.
///
/// Every accepted mutation commits a stock update plus exactly one ledger
/// entry, atomically, serialized per product by the store. The engine is not
/// idempotent: callers that may retry should pass an
/// [`ExpectedVersion::Exact`] so a replay of already-applied work fails with
/// `Conflict` instead of double-applying.
#[derive(Debug, Clone)]
pub struct StockMutationEngine<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> StockMutationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn add_stock(
        &self,
        id: ProductId,
        request: MutationRequest,
        actor: Actor,
    ) -> DomainResult<(Product, LogEntry)> {
        self.apply(id, StockAction::Added, request, actor, ExpectedVersion::Any)
    }

    pub fn remove_stock(
        &self,
        id: ProductId,
        request: MutationRequest,
        actor: Actor,
    ) -> DomainResult<(Product, LogEntry)> {
        self.apply(id, StockAction::Removed, request, actor, ExpectedVersion::Any)
    }

    /// Apply a mutation with an explicit concurrency expectation.
    pub fn apply(
        &self,
        id: ProductId,
        action: StockAction,
        request: MutationRequest,
        actor: Actor,
        expected: ExpectedVersion,
    ) -> DomainResult<(Product, LogEntry)> {
        let mutation = StockMutation {
            entry_id: LogEntryId::new(),
            action,
            amount: request.amount,
            reason: request.reason,
            by: actor,
            occurred_at: Utc::now(),
        };

        match self.store.apply_mutation(id, mutation, expected) {
            Ok((product, entry)) => {
                info!(
                    product_id = %id,
                    action = %entry.action,
                    amount = entry.amount,
                    stock = product.stock(),
                    by = %entry.by,
                    "stock mutation accepted"
                );
                Ok((product, entry))
            }
            Err(err) => {
                warn!(product_id = %id, action = %action, error = %err, "stock mutation rejected");
                Err(err)
            }
        }
    }
}

/// Parse a boundary amount: digits only, no leading zero.
///
/// The literal `"0"` parses but is rejected as non-positive, matching the
/// engine's own rule.
pub fn parse_amount(raw: &str) -> DomainResult<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation("amount must be digits only"));
    }
    if raw.len() > 1 && raw.starts_with('0') {
        return Err(DomainError::validation("amount cannot start with 0"));
    }
    let amount: u64 = raw
        .parse()
        .map_err(|_| DomainError::validation("amount too large"))?;
    if amount == 0 {
        return Err(DomainError::validation("amount must be a positive integer"));
    }
    Ok(amount)
}
