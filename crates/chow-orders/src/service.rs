//! # Order Service
//!
//! The orchestration layer for the order lifecycle. Every operation
//! follows the same shape: validate input, call into the repositories,
//! translate the result into a response DTO.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderService                                     │
//! │                                                                         │
//! │  Order header:    create_order, get_order, delete_order,               │
//! │                   list_customer_orders, list_restaurant_orders,        │
//! │                   list_orders_by_status, list_active_orders,           │
//! │                   list_active_restaurant_orders,                       │
//! │                   list_orders_by_date_range                            │
//! │                                                                         │
//! │  Lifecycle:       update_status, cancel_order, mark_paid               │
//! │                                                                         │
//! │  Pricing:         update_totals (stores breakdown, warns on            │
//! │                   sum-law mismatch), calculate_subtotal                │
//! │                                                                         │
//! │  Items:           add_item, update_item, update_item_quantity,         │
//! │                   remove_item, clear_items                             │
//! │                                                                         │
//! │  Modifiers:       add_modifier, remove_modifier, clear_modifiers       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use chow_core::pricing;
use chow_core::validation::{
    validate_amount_cents, validate_item_name, validate_notes, validate_quantity, validate_totals,
};
use chow_core::{OrderItemModifier, OrderStatus, OrderTotals, ValidationError};
use chow_db::Database;

use crate::dto::{
    AddItemRequest, AddModifierRequest, CalculatedSubtotalResponse, CreateOrderRequest,
    ModifierResponse, OrderDetailResponse, OrderItemDetailResponse, OrderItemResponse,
    OrderResponse, UpdateItemRequest, UpdateTotalsRequest,
};
use crate::error::ApiError;

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// The order lifecycle service.
///
/// Cheap to clone; holds only the database handle.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Creates a new service over a database handle.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    // =========================================================================
    // Order Header
    // =========================================================================

    /// Creates a new order in `created` status with zero totals.
    pub async fn create_order(&self, req: CreateOrderRequest) -> ApiResult<OrderResponse> {
        require_non_empty("customer_id", &req.customer_id)?;
        require_non_empty("restaurant_id", &req.restaurant_id)?;

        let order = self.db.orders().create(&req.into()).await?;

        info!(order_id = %order.id, customer_id = %order.customer_id, "Order created");
        Ok(order.into())
    }

    /// Gets the full order view: header, items, and each item's modifiers.
    pub async fn get_order(&self, order_id: &str) -> ApiResult<OrderDetailResponse> {
        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;

        let items = self.db.order_items().get_for_order(order_id).await?;
        let modifiers = self.db.order_item_modifiers().get_for_order(order_id).await?;

        // Group modifiers under their items; one query instead of N
        let mut by_item: HashMap<String, Vec<OrderItemModifier>> = HashMap::new();
        for modifier in modifiers {
            by_item
                .entry(modifier.order_item_id.clone())
                .or_default()
                .push(modifier);
        }

        let items = items
            .into_iter()
            .map(|item| {
                let modifiers = by_item.remove(&item.id).unwrap_or_default();
                let modifiers_total_cents = pricing::modifiers_total(&modifiers).cents();
                OrderItemDetailResponse {
                    item: item.into(),
                    modifiers: modifiers.into_iter().map(Into::into).collect(),
                    modifiers_total_cents,
                }
            })
            .collect();

        Ok(OrderDetailResponse {
            order: order.into(),
            items,
        })
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_customer_orders(&self, customer_id: &str) -> ApiResult<Vec<OrderResponse>> {
        let orders = self.db.orders().list_by_customer(customer_id).await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Lists a restaurant's orders, newest first.
    pub async fn list_restaurant_orders(
        &self,
        restaurant_id: &str,
    ) -> ApiResult<Vec<OrderResponse>> {
        let orders = self.db.orders().list_by_restaurant(restaurant_id).await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Lists all orders currently in a given status.
    pub async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> ApiResult<Vec<OrderResponse>> {
        let orders = self.db.orders().list_by_status(status).await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Lists a customer's in-flight orders (not delivered, cancelled or
    /// failed).
    pub async fn list_active_orders(&self, customer_id: &str) -> ApiResult<Vec<OrderResponse>> {
        let orders = self
            .db
            .orders()
            .list_active_by_customer(customer_id)
            .await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Lists a restaurant's open kitchen queue (confirmed or preparing
    /// orders, oldest confirmation first).
    pub async fn list_active_restaurant_orders(
        &self,
        restaurant_id: &str,
    ) -> ApiResult<Vec<OrderResponse>> {
        let orders = self
            .db
            .orders()
            .list_active_by_restaurant(restaurant_id)
            .await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Lists orders created within `[start, end]` inclusive, newest first.
    pub async fn list_orders_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ApiResult<Vec<OrderResponse>> {
        let orders = self.db.orders().list_by_date_range(start, end).await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    /// Deletes an order and, by cascade, its items and modifiers.
    pub async fn delete_order(&self, order_id: &str) -> ApiResult<()> {
        self.db.orders().delete(order_id).await?;
        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Moves an order to a new status.
    ///
    /// On first entry into a status, its lifecycle timestamp is stamped;
    /// re-entering a status never overwrites the original timestamp.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ApiResult<OrderResponse> {
        let order = self.db.orders().update_status(order_id, status).await?;
        info!(order_id = %order_id, status = %status, "Order status updated");
        Ok(order.into())
    }

    /// Cancels an order (moves it to `cancelled` and stamps
    /// `cancelled_at` if unset).
    pub async fn cancel_order(&self, order_id: &str) -> ApiResult<OrderResponse> {
        self.update_status(order_id, OrderStatus::Cancelled).await
    }

    /// Sets or clears the payment flag.
    pub async fn mark_paid(&self, order_id: &str, is_paid: bool) -> ApiResult<OrderResponse> {
        self.db.orders().set_paid(order_id, is_paid).await?;

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;
        Ok(order.into())
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Stores a caller-supplied fee breakdown on the order.
    ///
    /// The breakdown is validated for non-negative components and stored
    /// verbatim. If it violates the sum law
    /// (`total = subtotal + tax + fees + tip - discount`) it is still
    /// stored, but a warning is logged for reconciliation.
    pub async fn update_totals(
        &self,
        order_id: &str,
        req: UpdateTotalsRequest,
    ) -> ApiResult<OrderResponse> {
        let totals: OrderTotals = req.into();
        validate_totals(&totals)?;

        if !pricing::totals_consistent(&totals) {
            warn!(
                order_id = %order_id,
                stored_total = totals.total_cents,
                computed_total = pricing::order_total(&totals).cents(),
                "Stored totals violate the sum law"
            );
        }

        self.db.orders().update_totals(order_id, &totals).await?;
        debug!(order_id = %order_id, total = totals.total_cents, "Order totals updated");

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;
        Ok(order.into())
    }

    /// Recomputes the order's subtotal from its items:
    /// `SUM(quantity * unit_price_cents)`. An order with no items yields 0.
    pub async fn calculate_subtotal(
        &self,
        order_id: &str,
    ) -> ApiResult<CalculatedSubtotalResponse> {
        let calc = self.db.orders().calculate_subtotal(order_id).await?;
        Ok(calc.into())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds a line item to an order.
    ///
    /// Rejected with `PRECONDITION_FAILED` unless the order is in
    /// `created` status.
    pub async fn add_item(&self, req: AddItemRequest) -> ApiResult<OrderItemResponse> {
        validate_quantity(req.quantity)?;
        validate_item_name(&req.item_name)?;
        validate_amount_cents("unit_price", req.unit_price_cents)?;
        if let Some(notes) = &req.notes {
            validate_notes(notes)?;
        }

        let item = self.db.order_items().add(&req.into()).await?;
        debug!(order_id = %item.order_id, item_id = %item.id, "Item added");
        Ok(item.into())
    }

    /// Updates a line item's quantity and notes.
    pub async fn update_item(
        &self,
        item_id: &str,
        req: UpdateItemRequest,
    ) -> ApiResult<OrderItemResponse> {
        validate_quantity(req.quantity)?;
        if let Some(notes) = &req.notes {
            validate_notes(notes)?;
        }

        let item = self
            .db
            .order_items()
            .update(item_id, req.quantity, req.notes.as_deref())
            .await?;
        Ok(item.into())
    }

    /// Updates only a line item's quantity.
    pub async fn update_item_quantity(
        &self,
        item_id: &str,
        quantity: i64,
    ) -> ApiResult<OrderItemResponse> {
        validate_quantity(quantity)?;

        let item = self
            .db
            .order_items()
            .update_quantity(item_id, quantity)
            .await?;
        Ok(item.into())
    }

    /// Removes a line item (and its modifiers, by cascade).
    pub async fn remove_item(&self, item_id: &str) -> ApiResult<()> {
        self.db.order_items().delete(item_id).await?;
        Ok(())
    }

    /// Removes all items of an order.
    ///
    /// ## Returns
    /// Number of items removed.
    pub async fn clear_items(&self, order_id: &str) -> ApiResult<u64> {
        let removed = self.db.order_items().delete_all_for_order(order_id).await?;
        info!(order_id = %order_id, removed, "Order items cleared");
        Ok(removed)
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Attaches a modifier to a line item.
    pub async fn add_modifier(&self, req: AddModifierRequest) -> ApiResult<ModifierResponse> {
        require_non_empty("modifier_name", &req.modifier_name)?;
        require_non_empty("option_name", &req.option_name)?;

        let modifier = self.db.order_item_modifiers().add(&req.into()).await?;
        debug!(
            order_item_id = %modifier.order_item_id,
            modifier_id = %modifier.id,
            "Modifier added"
        );
        Ok(modifier.into())
    }

    /// Removes a modifier from a line item.
    pub async fn remove_modifier(&self, modifier_id: &str) -> ApiResult<()> {
        self.db.order_item_modifiers().delete(modifier_id).await?;
        Ok(())
    }

    /// Removes all modifiers of a line item.
    ///
    /// ## Returns
    /// Number of modifiers removed.
    pub async fn clear_modifiers(&self, item_id: &str) -> ApiResult<u64> {
        let removed = self
            .db
            .order_item_modifiers()
            .delete_all_for_item(item_id)
            .await?;
        Ok(removed)
    }
}

/// Rejects blank required string fields.
fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}
