//! # Order Item Modifier Repository
//!
//! Database operations for line item modifiers ("Size: Large, +$1.00").
//!
//! Modifiers follow the same mutability rule as items: they may only be
//! attached or removed while the parent order is in `created` status, and
//! the status check shares a transaction with the write.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::require_item_order_editable;
use chow_core::{NewOrderItemModifier, OrderItemModifier, OrderStatus};

/// Column list shared by all modifier SELECTs.
const MODIFIER_COLUMNS: &str = "\
    id, order_item_id, modifier_option_id, \
    modifier_name, option_name, price_delta_cents, created_at";

/// Repository for modifier operations.
#[derive(Debug, Clone)]
pub struct ModifierRepository {
    pool: SqlitePool,
}

impl ModifierRepository {
    /// Creates a new ModifierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ModifierRepository { pool }
    }

    /// Attaches a modifier to a line item.
    ///
    /// ## Snapshot Pattern
    /// Modifier group name, option name and price delta are copied from
    /// the catalog at order time; later catalog edits don't rewrite them.
    ///
    /// ## Errors
    /// - `NotFound` if the item doesn't exist
    /// - `NotEditable` if the parent order is past `created` status
    pub async fn add(&self, new_modifier: &NewOrderItemModifier) -> DbResult<OrderItemModifier> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            order_item_id = %new_modifier.order_item_id,
            modifier = %new_modifier.modifier_name,
            "Adding item modifier"
        );

        let mut tx = self.pool.begin().await?;
        require_item_order_editable(&mut tx, &new_modifier.order_item_id).await?;

        sqlx::query(
            r#"
            INSERT INTO order_item_modifiers (
                id, order_item_id, modifier_option_id,
                modifier_name, option_name, price_delta_cents,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new_modifier.order_item_id)
        .bind(&new_modifier.modifier_option_id)
        .bind(&new_modifier.modifier_name)
        .bind(&new_modifier.option_name)
        .bind(new_modifier.price_delta_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderItemModifier {
            id,
            order_item_id: new_modifier.order_item_id.clone(),
            modifier_option_id: new_modifier.modifier_option_id.clone(),
            modifier_name: new_modifier.modifier_name.clone(),
            option_name: new_modifier.option_name.clone(),
            price_delta_cents: new_modifier.price_delta_cents,
            created_at: now,
        })
    }

    /// Gets a modifier by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderItemModifier>> {
        let sql = format!("SELECT {MODIFIER_COLUMNS} FROM order_item_modifiers WHERE id = ?1");

        let modifier: Option<OrderItemModifier> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(modifier)
    }

    /// Gets all modifiers of a line item, in insertion order.
    pub async fn get_for_item(&self, item_id: &str) -> DbResult<Vec<OrderItemModifier>> {
        let sql = format!(
            "SELECT {MODIFIER_COLUMNS} FROM order_item_modifiers \
             WHERE order_item_id = ?1 ORDER BY created_at, id"
        );

        let modifiers: Vec<OrderItemModifier> = sqlx::query_as(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(modifiers)
    }

    /// Gets all modifiers across an entire order (for composing the full
    /// order view in one query instead of one per item).
    pub async fn get_for_order(&self, order_id: &str) -> DbResult<Vec<OrderItemModifier>> {
        let sql = format!(
            "SELECT m.{} FROM order_item_modifiers m \
             JOIN order_items i ON i.id = m.order_item_id \
             WHERE i.order_id = ?1 \
             ORDER BY i.created_at, i.id, m.created_at, m.id",
            MODIFIER_COLUMNS.replace(", ", ", m.")
        );

        let modifiers: Vec<OrderItemModifier> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(modifiers)
    }

    /// Removes a modifier.
    ///
    /// ## Errors
    /// - `NotFound` if the modifier doesn't exist
    /// - `NotEditable` if the parent order is past `created` status
    pub async fn delete(&self, modifier_id: &str) -> DbResult<()> {
        debug!(id = %modifier_id, "Deleting item modifier");

        let mut tx = self.pool.begin().await?;
        require_modifier_order_editable(&mut tx, modifier_id).await?;

        sqlx::query("DELETE FROM order_item_modifiers WHERE id = ?1")
            .bind(modifier_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes all modifiers of a line item.
    ///
    /// ## Returns
    /// Number of modifiers removed.
    pub async fn delete_all_for_item(&self, item_id: &str) -> DbResult<u64> {
        debug!(order_item_id = %item_id, "Clearing item modifiers");

        let mut tx = self.pool.begin().await?;
        require_item_order_editable(&mut tx, item_id).await?;

        let result = sqlx::query("DELETE FROM order_item_modifiers WHERE order_item_id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

/// Editability guard resolved through a modifier: modifier → item → order.
async fn require_modifier_order_editable(
    tx: &mut Transaction<'_, Sqlite>,
    modifier_id: &str,
) -> DbResult<()> {
    let row: Option<(String, OrderStatus)> = sqlx::query_as(
        r#"
        SELECT o.id, o.status
        FROM orders o
        JOIN order_items i ON i.order_id = o.id
        JOIN order_item_modifiers m ON m.order_item_id = i.id
        WHERE m.id = ?1
        "#,
    )
    .bind(modifier_id)
    .fetch_optional(&mut **tx)
    .await?;

    match row {
        None => Err(DbError::not_found("Order item modifier", modifier_id)),
        Some((order_id, status)) if !status.is_editable() => {
            Err(DbError::not_editable(order_id, status))
        }
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chow_core::{NewOrder, NewOrderItem};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn create_order_with_item(db: &Database) -> (String, String) {
        let order = db
            .orders()
            .create(&NewOrder {
                customer_id: "cust-1".to_string(),
                restaurant_id: "rest-1".to_string(),
                delivery_address_id: None,
                payment_method_id: None,
                delivery_street: None,
                delivery_city: None,
                delivery_state: None,
                delivery_postal_code: None,
                delivery_country: None,
            })
            .await
            .unwrap();

        let item = db
            .order_items()
            .add(&NewOrderItem {
                order_id: order.id.clone(),
                menu_item_id: "menu-1".to_string(),
                item_name: "Burger".to_string(),
                item_description: None,
                quantity: 1,
                unit_price_cents: 899,
                notes: None,
            })
            .await
            .unwrap();

        (order.id, item.id)
    }

    fn new_modifier(item_id: &str, delta: i64) -> NewOrderItemModifier {
        NewOrderItemModifier {
            order_item_id: item_id.to_string(),
            modifier_option_id: "opt-1".to_string(),
            modifier_name: "Cheese".to_string(),
            option_name: "Extra".to_string(),
            price_delta_cents: delta,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_modifiers() {
        let db = test_db().await;
        let (order_id, item_id) = create_order_with_item(&db).await;

        db.order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap();
        db.order_item_modifiers()
            .add(&new_modifier(&item_id, -50))
            .await
            .unwrap();

        let for_item = db
            .order_item_modifiers()
            .get_for_item(&item_id)
            .await
            .unwrap();
        assert_eq!(for_item.len(), 2);
        assert_eq!(for_item[0].price_delta_cents, 100);
        assert_eq!(for_item[1].price_delta_cents, -50);

        let for_order = db
            .order_item_modifiers()
            .get_for_order(&order_id)
            .await
            .unwrap();
        assert_eq!(for_order.len(), 2);
    }

    #[tokio::test]
    async fn test_add_modifier_to_unknown_item() {
        let db = test_db().await;
        let err = db
            .order_item_modifiers()
            .add(&new_modifier("nope", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_modifier_rejected_after_confirm() {
        let db = test_db().await;
        let (order_id, item_id) = create_order_with_item(&db).await;
        db.orders()
            .update_status(&order_id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let err = db
            .order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotEditable { .. }));
    }

    #[tokio::test]
    async fn test_delete_modifier() {
        let db = test_db().await;
        let (_, item_id) = create_order_with_item(&db).await;
        let modifier = db
            .order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap();

        db.order_item_modifiers()
            .delete(&modifier.id)
            .await
            .unwrap();
        assert!(db
            .order_item_modifiers()
            .get_by_id(&modifier.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_modifier_rejected_after_confirm() {
        let db = test_db().await;
        let (order_id, item_id) = create_order_with_item(&db).await;
        let modifier = db
            .order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap();
        db.orders()
            .update_status(&order_id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let err = db
            .order_item_modifiers()
            .delete(&modifier.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotEditable { .. }));
    }

    #[tokio::test]
    async fn test_clear_modifiers_for_item() {
        let db = test_db().await;
        let (_, item_id) = create_order_with_item(&db).await;
        db.order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap();
        db.order_item_modifiers()
            .add(&new_modifier(&item_id, 200))
            .await
            .unwrap();

        let removed = db
            .order_item_modifiers()
            .delete_all_for_item(&item_id)
            .await
            .unwrap();
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_modifiers_cascade_on_item_delete() {
        let db = test_db().await;
        let (_, item_id) = create_order_with_item(&db).await;
        let modifier = db
            .order_item_modifiers()
            .add(&new_modifier(&item_id, 100))
            .await
            .unwrap();

        db.order_items().delete(&item_id).await.unwrap();
        assert!(db
            .order_item_modifiers()
            .get_by_id(&modifier.id)
            .await
            .unwrap()
            .is_none());
    }
}
