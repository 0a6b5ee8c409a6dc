//! # Repository Module
//!
//! Database repository implementations for the order platform.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.orders().get_by_id(&id)                                    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, new_order)                                          │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── update_status(&self, id, status)                                  │
//! │  └── update_totals(&self, id, totals)                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`order::OrderRepository`] - Order header CRUD, status and totals
//! - [`order_item::OrderItemRepository`] - Line item operations
//! - [`modifier::ModifierRepository`] - Modifier operations

pub mod modifier;
pub mod order;
pub mod order_item;

use sqlx::{Sqlite, Transaction};

use crate::error::{DbError, DbResult};
use chow_core::OrderStatus;

/// Asserts, inside an open transaction, that the order exists and is still
/// in `created` status.
///
/// Every item/modifier mutation calls this before writing, on the same
/// transaction as the write, so a concurrent status change cannot slip in
/// between the check and the mutation.
pub(crate) async fn require_order_editable(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: &str,
) -> DbResult<()> {
    let status: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
        .bind(order_id)
        .fetch_optional(&mut **tx)
        .await?;

    match status {
        None => Err(DbError::not_found("Order", order_id)),
        Some(status) if !status.is_editable() => Err(DbError::not_editable(order_id, status)),
        Some(_) => Ok(()),
    }
}

/// Same as [`require_order_editable`], resolved through a line item: looks
/// up the parent order of `item_id` and asserts it is editable.
///
/// Returns the parent order's ID.
pub(crate) async fn require_item_order_editable(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: &str,
) -> DbResult<String> {
    let row: Option<(String, OrderStatus)> = sqlx::query_as(
        r#"
        SELECT o.id, o.status
        FROM orders o
        JOIN order_items i ON i.order_id = o.id
        WHERE i.id = ?1
        "#,
    )
    .bind(item_id)
    .fetch_optional(&mut **tx)
    .await?;

    match row {
        None => Err(DbError::not_found("Order item", item_id)),
        Some((order_id, status)) if !status.is_editable() => {
            Err(DbError::not_editable(order_id, status))
        }
        Some((order_id, _)) => Ok(order_id),
    }
}
