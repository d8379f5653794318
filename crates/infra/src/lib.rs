//! `stockbook-infra` — storage for the stock ledger.
//!
//! Owns the [`LedgerStore`](ledger_store::LedgerStore) abstraction and its
//! in-memory implementation. All stock changes commit through
//! `LedgerStore::apply_mutation`, which updates the cached stock and appends
//! the ledger entry as one atomic unit.

pub mod ledger_store;

pub use ledger_store::{InMemoryLedgerStore, LedgerStore};
