use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::{Actor, Entity};

use crate::product::ProductId;

/// Ledger entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntryId(Uuid);

impl LogEntryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for LogEntryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<LogEntryId> for Uuid {
    fn from(value: LogEntryId) -> Self {
        value.0
    }
}

impl FromStr for LogEntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Direction of an accepted stock mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Added,
    Removed,
}

impl StockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAction::Added => "added",
            StockAction::Removed => "removed",
        }
    }
}

impl core::fmt::Display for StockAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable record in a product's stock ledger.
///
/// Entries are:
/// - **immutable** (treat them as facts)
/// - **append-only** (corrections are new compensating entries, never edits)
/// - created exclusively by an accepted stock mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub product_id: ProductId,
    pub action: StockAction,
    /// Magnitude of the change; always positive.
    pub amount: u64,
    /// When the mutation was accepted.
    pub date: DateTime<Utc>,
    pub by: Actor,
    pub reason: String,
}

impl Entity for LogEntry {
    type Id = LogEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
