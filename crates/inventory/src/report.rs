//! Read-only ledger aggregations used for reporting.
//!
//! Pure functions over a product's log history; nothing here is persisted and
//! nothing here can desynchronize state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::log::{LogEntry, StockAction};

/// Total amounts per action over a log history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTotals {
    pub added: u64,
    pub removed: u64,
}

/// Inflow/outflow totals for one calendar date (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub added: u64,
    pub removed: u64,
}

/// Sum entry amounts per action.
pub fn aggregate_by_action(entries: &[LogEntry]) -> ActionTotals {
    entries.iter().fold(ActionTotals::default(), |mut acc, e| {
        match e.action {
            StockAction::Added => acc.added += e.amount,
            StockAction::Removed => acc.removed += e.amount,
        }
        acc
    })
}

/// Group entries by calendar date (UTC), summing amounts per action.
///
/// Output contains one record per distinct date, ordered ascending; this is
/// the series rendered as a per-day inflow vs outflow comparison.
pub fn aggregate_by_date(entries: &[LogEntry]) -> Vec<DailyTotals> {
    let mut buckets: BTreeMap<NaiveDate, ActionTotals> = BTreeMap::new();
    for e in entries {
        let bucket = buckets.entry(e.date.date_naive()).or_default();
        match e.action {
            StockAction::Added => bucket.added += e.amount,
            StockAction::Removed => bucket.removed += e.amount,
        }
    }

    buckets
        .into_iter()
        .map(|(date, totals)| DailyTotals {
            date,
            added: totals.added,
            removed: totals.removed,
        })
        .collect()
}
