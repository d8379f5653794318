//! `stockbook-service` — application services over the ledger store.
//!
//! This is the surface an API or UI layer calls: product directory CRUD,
//! the stock mutation engine, and the audit/reporting queries. Each service
//! is a thin, stateless facade over a shared [`LedgerStore`]; all domain
//! rules live in `stockbook-inventory` and all commits in `stockbook-infra`.
//!
//! Actor identity is injected by the caller (its authentication layer);
//! the services only record it.
//!
//! [`LedgerStore`]: stockbook_infra::LedgerStore

pub mod audit;
pub mod directory;
pub mod engine;

pub use audit::{AuditQuery, ProductHistory};
pub use directory::ProductDirectory;
pub use engine::{parse_amount, MutationRequest, StockMutationEngine};
