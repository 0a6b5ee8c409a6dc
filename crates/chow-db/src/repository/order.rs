//! # Order Repository
//!
//! Database operations for order headers.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Order { status: Created, totals: 0 }                │
//! │                                                                         │
//! │  2. BUILD (while status = created)                                     │
//! │     └── order_items().add() / modifiers().add()                        │
//! │     └── update_totals() → store the fee breakdown                      │
//! │                                                                         │
//! │  3. PROGRESS                                                           │
//! │     └── update_status(Confirmed) → items frozen, confirmed_at stamped  │
//! │     └── update_status(Preparing) → prepared_at stamped                 │
//! │     └── ... each lifecycle timestamp set at most once                  │
//! │                                                                         │
//! │  4. EXIT                                                               │
//! │     └── update_status(Delivered | Cancelled | Failed)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use chow_core::status::entry_timestamp_column;
use chow_core::{NewOrder, Order, OrderStatus, OrderTotalCalculation, OrderTotals};

/// Column list shared by all order SELECTs.
///
/// Runtime `query_as` maps by column name, so the list must stay in sync
/// with the `Order` struct fields.
const ORDER_COLUMNS: &str = "\
    id, customer_id, restaurant_id, \
    delivery_address_id, payment_method_id, \
    delivery_street, delivery_city, delivery_state, \
    delivery_postal_code, delivery_country, \
    status, \
    subtotal_cents, tax_cents, tax_rate_bps, \
    delivery_fee_cents, service_fee_cents, tip_cents, \
    discount_cents, total_cents, \
    is_paid, \
    created_at, updated_at, \
    confirmed_at, prepared_at, ready_at, picked_up_at, \
    delivered_at, cancelled_at, failed_at";

/// Repository for order header operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates a new order in `created` status with zero totals.
    ///
    /// ## Returns
    /// The created order with generated ID and timestamps.
    pub async fn create(&self, new_order: &NewOrder) -> DbResult<Order> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, customer_id = %new_order.customer_id, "Creating order");

        let order = Order {
            id: id.clone(),
            customer_id: new_order.customer_id.clone(),
            restaurant_id: new_order.restaurant_id.clone(),
            delivery_address_id: new_order.delivery_address_id.clone(),
            payment_method_id: new_order.payment_method_id.clone(),
            delivery_street: new_order.delivery_street.clone(),
            delivery_city: new_order.delivery_city.clone(),
            delivery_state: new_order.delivery_state.clone(),
            delivery_postal_code: new_order.delivery_postal_code.clone(),
            delivery_country: new_order.delivery_country.clone(),
            status: OrderStatus::Created,
            subtotal_cents: 0,
            tax_cents: 0,
            tax_rate_bps: None,
            delivery_fee_cents: 0,
            service_fee_cents: 0,
            tip_cents: 0,
            discount_cents: 0,
            total_cents: 0,
            is_paid: false,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            prepared_at: None,
            ready_at: None,
            picked_up_at: None,
            delivered_at: None,
            cancelled_at: None,
            failed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, restaurant_id,
                delivery_address_id, payment_method_id,
                delivery_street, delivery_city, delivery_state,
                delivery_postal_code, delivery_country,
                status,
                subtotal_cents, tax_cents, tax_rate_bps,
                delivery_fee_cents, service_fee_cents, tip_cents,
                discount_cents, total_cents,
                is_paid,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10,
                ?11,
                ?12, ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19,
                ?20,
                ?21, ?22
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.restaurant_id)
        .bind(&order.delivery_address_id)
        .bind(&order.payment_method_id)
        .bind(&order.delivery_street)
        .bind(&order.delivery_city)
        .bind(&order.delivery_state)
        .bind(&order.delivery_postal_code)
        .bind(&order.delivery_country)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.tax_cents)
        .bind(order.tax_rate_bps)
        .bind(order.delivery_fee_cents)
        .bind(order.service_fee_cents)
        .bind(order.tip_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(order.is_paid)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE customer_id = ?1 ORDER BY created_at DESC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists a restaurant's orders, newest first.
    pub async fn list_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE restaurant_id = ?1 ORDER BY created_at DESC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists all orders in a given status, newest first.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE status = ?1 ORDER BY created_at DESC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists a customer's in-flight orders (not delivered, cancelled or
    /// failed), newest first.
    pub async fn list_active_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE customer_id = ?1 \
               AND status NOT IN ('delivered', 'cancelled', 'failed') \
             ORDER BY created_at DESC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists a restaurant's open kitchen queue: orders in `confirmed` or
    /// `preparing` status, oldest confirmation first.
    pub async fn list_active_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE restaurant_id = ?1 \
               AND status IN ('confirmed', 'preparing') \
             ORDER BY confirmed_at ASC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists orders created within `[start, end]` inclusive, newest first.
    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE created_at BETWEEN ?1 AND ?2 \
             ORDER BY created_at DESC"
        );

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Updates an order's status.
    ///
    /// ## Timestamp Rule
    /// The lifecycle timestamp of the new status is stamped with
    /// `COALESCE(col, now)`: first entry sets it, a repeated entry leaves
    /// the original value untouched. No ordering of statuses is enforced.
    ///
    /// ## Returns
    /// The order after the update.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> DbResult<Order> {
        let now = Utc::now();

        debug!(id = %order_id, status = %status, "Updating order status");

        let sql = match entry_timestamp_column(status) {
            Some(col) => format!(
                "UPDATE orders SET status = ?1, updated_at = ?2, \
                 {col} = COALESCE({col}, ?2) WHERE id = ?3"
            ),
            None => "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3".to_string(),
        };

        let result = sqlx::query(&sql)
            .bind(status)
            .bind(now)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Stores a caller-supplied fee breakdown verbatim.
    ///
    /// ## When To Call
    /// After adding/removing items, or when fees/tip/discount change.
    pub async fn update_totals(&self, order_id: &str, totals: &OrderTotals) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                subtotal_cents = ?2,
                tax_cents = ?3,
                tax_rate_bps = ?4,
                delivery_fee_cents = ?5,
                service_fee_cents = ?6,
                tip_cents = ?7,
                discount_cents = ?8,
                total_cents = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(totals.subtotal_cents)
        .bind(totals.tax_cents)
        .bind(totals.tax_rate_bps)
        .bind(totals.delivery_fee_cents)
        .bind(totals.service_fee_cents)
        .bind(totals.tip_cents)
        .bind(totals.discount_cents)
        .bind(totals.total_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Sets the payment flag.
    pub async fn set_paid(&self, order_id: &str, is_paid: bool) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE orders SET is_paid = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(is_paid)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Recomputes the subtotal from the order's items:
    /// `SUM(quantity * unit_price_cents)`.
    ///
    /// Modifier price deltas are not included; they are aggregated
    /// separately by the caller. An order with no items yields 0.
    pub async fn calculate_subtotal(&self, order_id: &str) -> DbResult<OrderTotalCalculation> {
        // Existence check first so an unknown order is NotFound, not $0.00
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM orders WHERE id = ?1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Order", order_id));
        }

        let subtotal: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(quantity * unit_price_cents) FROM order_items WHERE order_id = ?1",
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(OrderTotalCalculation {
            order_id: order_id.to_string(),
            calculated_subtotal_cents: subtotal.unwrap_or(0),
        })
    }

    /// Deletes an order.
    ///
    /// Items and modifiers are removed by `ON DELETE CASCADE`.
    pub async fn delete(&self, order_id: &str) -> DbResult<()> {
        debug!(id = %order_id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_order() -> NewOrder {
        NewOrder {
            customer_id: "cust-1".to_string(),
            restaurant_id: "rest-1".to_string(),
            delivery_address_id: None,
            payment_method_id: None,
            delivery_street: Some("1 Main St".to_string()),
            delivery_city: Some("Springfield".to_string()),
            delivery_state: None,
            delivery_postal_code: None,
            delivery_country: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;

        let created = db.orders().create(&new_order()).await.unwrap();
        assert_eq!(created.status, OrderStatus::Created);
        assert_eq!(created.total_cents, 0);
        assert!(!created.is_paid);

        let fetched = db.orders().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.delivery_street.as_deref(), Some("1 Main St"));
        assert_eq!(fetched.confirmed_at, None);
    }

    #[tokio::test]
    async fn test_get_unknown_order() {
        let db = test_db().await;
        assert!(db.orders().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_timestamp_stamped_once() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        let after_confirm = db
            .orders()
            .update_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let first_stamp = after_confirm.confirmed_at.unwrap();

        // Bounce away and back; confirmed_at must survive
        db.orders()
            .update_status(&order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        let reentered = db
            .orders()
            .update_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        assert_eq!(reentered.status, OrderStatus::Confirmed);
        assert_eq!(reentered.confirmed_at.unwrap(), first_stamp);
        assert!(reentered.prepared_at.is_some());
    }

    #[tokio::test]
    async fn test_direct_to_delivered() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        let delivered = db
            .orders()
            .update_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap();

        assert!(delivered.delivered_at.is_some());
        assert!(delivered.confirmed_at.is_none());
        assert!(delivered.ready_at.is_none());
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let db = test_db().await;
        let err = db
            .orders()
            .update_status("nope", OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_totals_stored_verbatim() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        let totals = OrderTotals {
            subtotal_cents: 1350,
            tax_cents: 111,
            tax_rate_bps: Some(825),
            delivery_fee_cents: 299,
            service_fee_cents: 150,
            tip_cents: 300,
            discount_cents: 200,
            total_cents: 2010,
        };
        db.orders().update_totals(&order.id, &totals).await.unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.totals(), totals);
    }

    #[tokio::test]
    async fn test_set_paid() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        db.orders().set_paid(&order.id, true).await.unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert!(fetched.is_paid);
    }

    #[tokio::test]
    async fn test_list_queries() {
        let db = test_db().await;
        let a = db.orders().create(&new_order()).await.unwrap();
        let b = db.orders().create(&new_order()).await.unwrap();
        db.orders()
            .update_status(&b.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let all = db.orders().list_by_customer("cust-1").await.unwrap();
        assert_eq!(all.len(), 2);

        let active = db.orders().list_active_by_customer("cust-1").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);

        let cancelled = db
            .orders()
            .list_by_status(OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.len(), 1);

        let by_restaurant = db.orders().list_by_restaurant("rest-1").await.unwrap();
        assert_eq!(by_restaurant.len(), 2);
    }

    #[tokio::test]
    async fn test_list_active_by_restaurant() {
        let db = test_db().await;

        // a confirmed first, b confirmed later and moved on to preparing
        let a = db.orders().create(&new_order()).await.unwrap();
        let b = db.orders().create(&new_order()).await.unwrap();
        let created_only = db.orders().create(&new_order()).await.unwrap();
        let cancelled = db.orders().create(&new_order()).await.unwrap();

        db.orders()
            .update_status(&a.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        db.orders()
            .update_status(&b.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        db.orders()
            .update_status(&b.id, OrderStatus::Preparing)
            .await
            .unwrap();
        db.orders()
            .update_status(&cancelled.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let queue = db
            .orders()
            .list_active_by_restaurant("rest-1")
            .await
            .unwrap();

        // Only confirmed/preparing orders, oldest confirmation first
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].id, a.id);
        assert_eq!(queue[1].id, b.id);
        assert!(!queue.iter().any(|o| o.id == created_only.id));
    }

    #[tokio::test]
    async fn test_list_by_date_range() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        let now = Utc::now();
        let hour = chrono::Duration::hours(1);

        let hits = db
            .orders()
            .list_by_date_range(now - hour, now + hour)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, order.id);

        let misses = db
            .orders()
            .list_by_date_range(now - hour * 48, now - hour * 24)
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_subtotal_empty_order() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        let calc = db.orders().calculate_subtotal(&order.id).await.unwrap();
        assert_eq!(calc.calculated_subtotal_cents, 0);
    }

    #[tokio::test]
    async fn test_calculate_subtotal_unknown_order() {
        let db = test_db().await;
        let err = db.orders().calculate_subtotal("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_order() {
        let db = test_db().await;
        let order = db.orders().create(&new_order()).await.unwrap();

        db.orders().delete(&order.id).await.unwrap();
        assert!(db.orders().get_by_id(&order.id).await.unwrap().is_none());

        let err = db.orders().delete(&order.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
