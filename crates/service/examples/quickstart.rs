//! Walk the core flow: create a product, mutate stock, read the audit trail.
//!
//! Run with `RUST_LOG=info cargo run -p stockbook-service --example quickstart`.

use std::sync::Arc;

use stockbook_core::Actor;
use stockbook_infra::InMemoryLedgerStore;
use stockbook_inventory::NewProduct;
use stockbook_service::{AuditQuery, MutationRequest, ProductDirectory, StockMutationEngine};

fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = ProductDirectory::new(Arc::clone(&store));
    let engine = StockMutationEngine::new(Arc::clone(&store));
    let audit = AuditQuery::new(Arc::clone(&store));

    let alice = Actor::new("alice")?;
    let bob = Actor::new("bob")?;

    let product = directory.create(NewProduct {
        name: "Widget".to_string(),
        category: "Tools".to_string(),
        initial_stock: 10,
        created_by: alice.clone(),
    })?;
    let id = product.id_typed();

    engine.add_stock(
        id,
        MutationRequest {
            amount: 5,
            reason: "restock".to_string(),
        },
        alice,
    )?;
    engine.remove_stock(
        id,
        MutationRequest {
            amount: 3,
            reason: "sale".to_string(),
        },
        bob,
    )?;

    let history = audit.product_with_history(id)?;
    println!(
        "{} [{}]: stock {} after {} ledger entries",
        history.product.name(),
        history.product.category(),
        history.product.stock(),
        history.logs.len()
    );

    let totals = audit.action_totals(id)?;
    println!("added {} / removed {}", totals.added, totals.removed);

    for day in audit.daily_totals(id)? {
        println!("{}: +{} -{}", day.date, day.added, day.removed);
    }

    Ok(())
}
