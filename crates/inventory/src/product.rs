use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{Actor, Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};

use crate::log::{LogEntry, LogEntryId, StockAction};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Caller input for product creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    /// Starting quantity; must be a positive integer.
    pub initial_stock: u64,
    pub created_by: Actor,
}

/// Aggregate root: Product.
///
/// Holds the cached stock projection; the authoritative record is the
/// product's ledger of [`LogEntry`] records. `stock` must always equal
/// `initial_stock + Σ added − Σ removed` over the full ledger, which
/// [`Product::replayed_stock`] recomputes from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    initial_stock: u64,
    stock: u64,
    created_by: Actor,
    last_updated_by: Actor,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Product {
    /// Validate and build a new product.
    ///
    /// The identifier and creation time are passed in explicitly so the
    /// decision logic stays deterministic (and testable).
    pub fn create(id: ProductId, new: NewProduct, created_at: DateTime<Utc>) -> DomainResult<Self> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if new.category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if new.initial_stock == 0 {
            return Err(DomainError::validation(
                "initial stock must be a positive integer",
            ));
        }

        Ok(Self {
            id,
            name: new.name,
            category: new.category,
            initial_stock: new.initial_stock,
            stock: new.initial_stock,
            last_updated_by: new.created_by.clone(),
            created_by: new.created_by,
            created_at,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn initial_stock(&self) -> u64 {
        self.initial_stock
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn created_by(&self) -> &Actor {
        &self.created_by
    }

    pub fn last_updated_by(&self) -> &Actor {
        &self.last_updated_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Edit name/category. Independent of the stock ledger; records the
    /// editing actor as `last_updated_by`.
    pub fn update_metadata(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        actor: Actor,
    ) -> DomainResult<()> {
        let name = name.into();
        let category = category.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        self.name = name;
        self.category = category;
        self.last_updated_by = actor;
        self.version += 1;
        Ok(())
    }

    /// Recompute stock by replaying the ledger from `initial_stock`.
    pub fn replayed_stock(&self, entries: &[LogEntry]) -> u64 {
        entries.iter().fold(self.initial_stock, |acc, e| match e.action {
            StockAction::Added => acc + e.amount,
            StockAction::Removed => acc - e.amount,
        })
    }

    /// Whether the cached `stock` agrees with a full ledger replay.
    pub fn ledger_consistent(&self, entries: &[LogEntry]) -> bool {
        self.stock == self.replayed_stock(entries)
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: add or remove stock.
///
/// `entry_id` and `occurred_at` are supplied by the caller so that
/// [`Product::handle`] stays pure and deterministic; the service layer fills
/// them in at acceptance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMutation {
    pub entry_id: LogEntryId,
    pub action: StockAction,
    pub amount: u64,
    pub reason: String,
    pub by: Actor,
    pub occurred_at: DateTime<Utc>,
}

impl Aggregate for Product {
    type Command = StockMutation;
    type Event = LogEntry;
    type Error = DomainError;

    fn apply(&mut self, entry: &Self::Event) {
        match entry.action {
            StockAction::Added => self.stock += entry.amount,
            StockAction::Removed => self.stock -= entry.amount,
        }
        self.last_updated_by = entry.by.clone();

        // Deterministic version tracking: +1 per applied entry.
        self.version += 1;
    }

    /// Validate a mutation against current state; first failure wins.
    ///
    /// An accepted mutation yields exactly one ledger entry. Removals that
    /// exceed current stock are rejected outright, never clamped.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if command.amount == 0 {
            return Err(DomainError::validation("amount must be a positive integer"));
        }
        if command.reason.trim().is_empty() {
            return Err(DomainError::validation("reason required"));
        }
        match command.action {
            StockAction::Removed if command.amount > self.stock => {
                return Err(DomainError::validation("insufficient stock"));
            }
            StockAction::Added if self.stock.checked_add(command.amount).is_none() => {
                return Err(DomainError::validation("stock overflow"));
            }
            _ => {}
        }

        Ok(vec![LogEntry {
            id: command.entry_id,
            product_id: self.id,
            action: command.action,
            amount: command.amount,
            date: command.occurred_at,
            by: command.by.clone(),
            reason: command.reason.clone(),
        }])
    }
}
