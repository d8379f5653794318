//! `stockbook-inventory` — the stock ledger domain.
//!
//! A [`Product`] owns an append-only sequence of [`LogEntry`] records; the
//! ledger is the source of truth and the product's `stock` is a cached
//! projection of it. Decision logic lives in [`Product::handle`] (pure),
//! state evolution in [`Product::apply`]; committing both durably is the
//! store's job (`stockbook-infra`).

pub mod log;
pub mod product;
pub mod report;

pub use log::{LogEntry, LogEntryId, StockAction};
pub use product::{NewProduct, Product, ProductId, StockMutation};
pub use report::{aggregate_by_action, aggregate_by_date, ActionTotals, DailyTotals};
