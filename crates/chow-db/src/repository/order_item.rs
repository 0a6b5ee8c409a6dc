//! # Order Item Repository
//!
//! Database operations for line items.
//!
//! ## Mutability Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Items are editable ONLY while status = created            │
//! │                                                                         │
//! │  add / update / delete item                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── SELECT status FROM orders WHERE id = ?                       │
//! │       │        │                                                        │
//! │       │        ├── not found  → NotFound, ROLLBACK                     │
//! │       │        ├── ≠ created  → NotEditable, ROLLBACK                  │
//! │       │        └── = created  → continue                               │
//! │       │                                                                 │
//! │       ├── INSERT / UPDATE / DELETE order_items ...                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Check and write share one transaction, so a concurrent confirm       │
//! │  cannot land between them.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{require_item_order_editable, require_order_editable};
use chow_core::{NewOrderItem, OrderItem};

/// Column list shared by all item SELECTs.
const ITEM_COLUMNS: &str = "\
    id, order_id, menu_item_id, \
    item_name, item_description, \
    quantity, unit_price_cents, notes, created_at";

/// Repository for line item operations.
#[derive(Debug, Clone)]
pub struct OrderItemRepository {
    pool: SqlitePool,
}

impl OrderItemRepository {
    /// Creates a new OrderItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderItemRepository { pool }
    }

    /// Adds a line item to an order.
    ///
    /// ## Snapshot Pattern
    /// Menu item details (name, description, unit price) are copied onto
    /// the item row. This preserves order history even if the menu
    /// changes later.
    ///
    /// ## Errors
    /// - `NotFound` if the order doesn't exist
    /// - `NotEditable` if the order is past `created` status
    pub async fn add(&self, new_item: &NewOrderItem) -> DbResult<OrderItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            order_id = %new_item.order_id,
            menu_item_id = %new_item.menu_item_id,
            "Adding order item"
        );

        let mut tx = self.pool.begin().await?;
        require_order_editable(&mut tx, &new_item.order_id).await?;

        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, menu_item_id,
                item_name, item_description,
                quantity, unit_price_cents, notes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&id)
        .bind(&new_item.order_id)
        .bind(&new_item.menu_item_id)
        .bind(&new_item.item_name)
        .bind(&new_item.item_description)
        .bind(new_item.quantity)
        .bind(new_item.unit_price_cents)
        .bind(&new_item.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderItem {
            id,
            order_id: new_item.order_id.clone(),
            menu_item_id: new_item.menu_item_id.clone(),
            item_name: new_item.item_name.clone(),
            item_description: new_item.item_description.clone(),
            quantity: new_item.quantity,
            unit_price_cents: new_item.unit_price_cents,
            notes: new_item.notes.clone(),
            created_at: now,
        })
    }

    /// Gets a line item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE id = ?1");

        let item: Option<OrderItem> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets all items of an order, in insertion order.
    pub async fn get_for_order(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ?1 ORDER BY created_at, id"
        );

        let items: Vec<OrderItem> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Updates a line item's quantity and notes.
    ///
    /// ## Errors
    /// - `NotFound` if the item doesn't exist
    /// - `NotEditable` if the parent order is past `created` status
    pub async fn update(
        &self,
        item_id: &str,
        quantity: i64,
        notes: Option<&str>,
    ) -> DbResult<OrderItem> {
        let mut tx = self.pool.begin().await?;
        require_item_order_editable(&mut tx, item_id).await?;

        sqlx::query("UPDATE order_items SET quantity = ?2, notes = ?3 WHERE id = ?1")
            .bind(item_id)
            .bind(quantity)
            .bind(notes)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(item_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order item", item_id))
    }

    /// Updates only a line item's quantity.
    pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> DbResult<OrderItem> {
        let mut tx = self.pool.begin().await?;
        require_item_order_editable(&mut tx, item_id).await?;

        sqlx::query("UPDATE order_items SET quantity = ?2 WHERE id = ?1")
            .bind(item_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(item_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order item", item_id))
    }

    /// Deletes a line item.
    ///
    /// Its modifiers are removed by `ON DELETE CASCADE`.
    pub async fn delete(&self, item_id: &str) -> DbResult<()> {
        debug!(id = %item_id, "Deleting order item");

        let mut tx = self.pool.begin().await?;
        require_item_order_editable(&mut tx, item_id).await?;

        sqlx::query("DELETE FROM order_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes all items of an order (clearing the cart).
    ///
    /// ## Returns
    /// Number of items removed.
    pub async fn delete_all_for_order(&self, order_id: &str) -> DbResult<u64> {
        debug!(order_id = %order_id, "Clearing order items");

        let mut tx = self.pool.begin().await?;
        require_order_editable(&mut tx, order_id).await?;

        let result = sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
