use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;

use stockbook_core::{
    Actor, Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, ExpectedVersion,
};
use stockbook_inventory::{LogEntry, NewProduct, Product, ProductId, StockMutation};

use super::LedgerStore;

/// One product's state: the cached projection plus its append-only ledger.
///
/// Everything that must change together lives behind the slot's `Mutex`, so
/// a mutation's stock update and log append commit as a unit, and readers
/// see either all of it or none of it.
#[derive(Debug)]
struct Slot {
    product: Product,
    ledger: Vec<LogEntry>,
    deleted: bool,
}

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<ProductId, Arc<Mutex<Slot>>>,
    /// Creation order, for stable listing.
    order: Vec<ProductId>,
}

/// In-memory ledger store.
///
/// Per-product mutual exclusion comes from the slot `Mutex`: the outer map
/// lock is held only long enough to find the slot, so mutations on different
/// products never contend.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: ProductId) -> DomainResult<Arc<Mutex<Slot>>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| DomainError::storage("ledger store lock poisoned"))?;
        inner.slots.get(&id).cloned().ok_or(DomainError::NotFound)
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::storage("product slot lock poisoned")
}

impl LedgerStore for InMemoryLedgerStore {
    fn create_product(&self, new: NewProduct) -> DomainResult<Product> {
        // Validate before touching the map; a rejected create has no effect.
        let id = ProductId::new(AggregateId::new());
        let product = Product::create(id, new, Utc::now())?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("ledger store lock poisoned"))?;
        inner.slots.insert(
            id,
            Arc::new(Mutex::new(Slot {
                product: product.clone(),
                ledger: Vec::new(),
                deleted: false,
            })),
        );
        inner.order.push(id);
        Ok(product)
    }

    fn get(&self, id: ProductId) -> DomainResult<Product> {
        let slot = self.slot(id)?;
        let guard = slot.lock().map_err(poisoned)?;
        if guard.deleted {
            return Err(DomainError::NotFound);
        }
        Ok(guard.product.clone())
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| DomainError::storage("ledger store lock poisoned"))?;

        let mut products = Vec::with_capacity(inner.order.len());
        for id in &inner.order {
            let Some(slot) = inner.slots.get(id) else {
                continue;
            };
            let guard = slot.lock().map_err(poisoned)?;
            if !guard.deleted {
                products.push(guard.product.clone());
            }
        }
        Ok(products)
    }

    fn update_metadata(
        &self,
        id: ProductId,
        name: &str,
        category: &str,
        actor: Actor,
    ) -> DomainResult<Product> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(poisoned)?;
        if guard.deleted {
            return Err(DomainError::NotFound);
        }
        guard.product.update_metadata(name, category, actor)?;
        Ok(guard.product.clone())
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(poisoned)?;
        if guard.deleted {
            return Err(DomainError::NotFound);
        }
        // Soft delete: the ledger stays for audit, the product disappears
        // from every read path.
        guard.deleted = true;
        Ok(())
    }

    fn apply_mutation(
        &self,
        id: ProductId,
        mutation: StockMutation,
        expected: ExpectedVersion,
    ) -> DomainResult<(Product, LogEntry)> {
        let slot = self.slot(id)?;

        // Read-validate-write happens entirely under the slot lock; this is
        // the per-product serialization point.
        let mut guard = slot.lock().map_err(poisoned)?;
        if guard.deleted {
            return Err(DomainError::NotFound);
        }
        expected.check(guard.product.version())?;

        let entries = guard.product.handle(&mutation)?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::invariant("accepted mutation produced no ledger entry"))?;

        guard.product.apply(&entry);
        guard.ledger.push(entry.clone());
        debug_assert!(guard.product.ledger_consistent(&guard.ledger));

        Ok((guard.product.clone(), entry))
    }

    fn history(&self, id: ProductId) -> DomainResult<(Product, Vec<LogEntry>)> {
        let slot = self.slot(id)?;
        let guard = slot.lock().map_err(poisoned)?;
        if guard.deleted {
            return Err(DomainError::NotFound);
        }

        let mut entries = guard.ledger.clone();
        // Stable sort: equal dates keep their insertion (append) order.
        entries.sort_by_key(|e| e.date);
        Ok((guard.product.clone(), entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use stockbook_inventory::{LogEntryId, StockAction};

    fn actor(name: &str) -> Actor {
        Actor::new(name.to_string()).unwrap()
    }

    fn new_widget(initial: u64) -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            category: "Tools".to_string(),
            initial_stock: initial,
            created_by: actor("alice"),
        }
    }

    fn mutation(action: StockAction, amount: u64, reason: &str, by: &str) -> StockMutation {
        StockMutation {
            entry_id: LogEntryId::new(),
            action,
            amount,
            reason: reason.to_string(),
            by: actor(by),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = InMemoryLedgerStore::new();
        let created = store.create_product(new_widget(10)).unwrap();
        let fetched = store.get(created.id_typed()).unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn get_unknown_product_is_not_found() {
        let store = InMemoryLedgerStore::new();
        let err = store.get(ProductId::new(AggregateId::new())).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn rejected_create_leaves_store_empty() {
        let store = InMemoryLedgerStore::new();
        let err = store.create_product(new_widget(0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_in_creation_order() {
        let store = InMemoryLedgerStore::new();
        let mut names = Vec::new();
        for name in ["Anvil", "Bolt", "Clamp"] {
            let mut new = new_widget(5);
            new.name = name.to_string();
            store.create_product(new).unwrap();
            names.push(name.to_string());
        }
        let listed: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn accepted_mutation_commits_stock_and_log_together() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(10)).unwrap();

        let (updated, entry) = store
            .apply_mutation(
                product.id_typed(),
                mutation(StockAction::Added, 5, "restock", "alice"),
                ExpectedVersion::Any,
            )
            .unwrap();

        assert_eq!(updated.stock(), 15);
        assert_eq!(entry.amount, 5);
        assert_eq!(entry.action, StockAction::Added);

        let (fetched, history) = store.history(product.id_typed()).unwrap();
        assert_eq!(fetched.stock(), 15);
        assert_eq!(history, vec![entry]);
        assert!(fetched.ledger_consistent(&history));
    }

    #[test]
    fn rejected_mutation_has_no_effect() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(3)).unwrap();

        let err = store
            .apply_mutation(
                product.id_typed(),
                mutation(StockAction::Removed, 5, "sale", "bob"),
                ExpectedVersion::Any,
            )
            .unwrap_err();
        assert_eq!(err, DomainError::validation("insufficient stock"));

        let (fetched, history) = store.history(product.id_typed()).unwrap();
        assert_eq!(fetched.stock(), 3);
        assert_eq!(fetched.last_updated_by().as_str(), "alice");
        assert!(history.is_empty());
    }

    #[test]
    fn stale_expected_version_conflicts_without_effect() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(10)).unwrap();
        let stale = product.version();

        store
            .apply_mutation(
                product.id_typed(),
                mutation(StockAction::Added, 1, "restock", "alice"),
                ExpectedVersion::Exact(stale),
            )
            .unwrap();

        // Same expectation again: the version has moved on.
        let err = store
            .apply_mutation(
                product.id_typed(),
                mutation(StockAction::Added, 1, "restock", "alice"),
                ExpectedVersion::Exact(stale),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let (fetched, history) = store.history(product.id_typed()).unwrap();
        assert_eq!(fetched.stock(), 11);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn update_metadata_records_actor() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(10)).unwrap();

        let updated = store
            .update_metadata(product.id_typed(), "Widget Pro", "Hardware", actor("carol"))
            .unwrap();
        assert_eq!(updated.name(), "Widget Pro");
        assert_eq!(updated.last_updated_by().as_str(), "carol");
        assert_eq!(store.get(product.id_typed()).unwrap(), updated);
    }

    #[test]
    fn soft_delete_hides_product_but_keeps_the_ledger() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(10)).unwrap();
        let id = product.id_typed();

        store
            .apply_mutation(
                id,
                mutation(StockAction::Removed, 2, "sale", "bob"),
                ExpectedVersion::Any,
            )
            .unwrap();
        store.delete(id).unwrap();

        assert_eq!(store.get(id).unwrap_err(), DomainError::NotFound);
        assert_eq!(store.history(id).unwrap_err(), DomainError::NotFound);
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.delete(id).unwrap_err(), DomainError::NotFound);
        assert_eq!(
            store
                .apply_mutation(
                    id,
                    mutation(StockAction::Added, 1, "restock", "alice"),
                    ExpectedVersion::Any,
                )
                .unwrap_err(),
            DomainError::NotFound
        );

        // Audit trail survives the delete inside the slot.
        let slot = store.slot(id).unwrap();
        let guard = slot.lock().unwrap();
        assert_eq!(guard.ledger.len(), 1);
        assert!(guard.deleted);
    }

    #[test]
    fn history_sorts_by_date_with_stable_ties() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(100)).unwrap();
        let id = product.id_typed();

        let t1: DateTime<Utc> = "2026-03-02T10:00:00Z".parse().unwrap();
        let t0: DateTime<Utc> = "2026-03-01T10:00:00Z".parse().unwrap();

        // Appended out of date order on purpose.
        for (at, amount) in [(t1, 1), (t0, 2), (t1, 3)] {
            let mut m = mutation(StockAction::Added, amount, "audit", "alice");
            m.occurred_at = at;
            store.apply_mutation(id, m, ExpectedVersion::Any).unwrap();
        }

        let (_, history) = store.history(id).unwrap();
        let amounts: Vec<u64> = history.iter().map(|e| e.amount).collect();
        // t0 first, then the two t1 entries in insertion order.
        assert_eq!(amounts, vec![2, 1, 3]);
    }

    #[test]
    fn repeated_reads_are_identical_without_intervening_mutation() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(new_widget(10)).unwrap();
        store
            .apply_mutation(
                product.id_typed(),
                mutation(StockAction::Added, 4, "restock", "alice"),
                ExpectedVersion::Any,
            )
            .unwrap();

        let first = store.history(product.id_typed()).unwrap();
        let second = store.history(product.id_typed()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_mutations_on_one_product_serialize() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let product = store.create_product(new_widget(1000)).unwrap();
        let id = product.id_typed();

        let threads: usize = 8;
        let per_thread: usize = 50;
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        let action = if (t + i) % 2 == 0 {
                            StockAction::Added
                        } else {
                            StockAction::Removed
                        };
                        let m = StockMutation {
                            entry_id: LogEntryId::new(),
                            action,
                            amount: 1,
                            reason: "load test".to_string(),
                            by: Actor::new(format!("worker-{t}")).unwrap(),
                            occurred_at: Utc::now(),
                        };
                        store.apply_mutation(id, m, ExpectedVersion::Any).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let (fetched, history) = store.history(id).unwrap();
        assert_eq!(history.len(), threads * per_thread);
        assert!(fetched.ledger_consistent(&history));
    }
}
