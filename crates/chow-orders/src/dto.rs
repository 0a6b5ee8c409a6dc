//! # Data Transfer Objects
//!
//! Request and response shapes for service operations. All DTOs serialize
//! with camelCase field names for API consumers; internal domain types stay
//! snake_case.
//!
//! ## Conversion Direction
//! ```text
//! Request DTO ──► domain type (chow-core) ──► repository (chow-db)
//! repository  ──► domain type              ──► Response DTO
//! ```

use serde::{Deserialize, Serialize};

use chow_core::pricing;
use chow_core::{
    NewOrder, NewOrderItem, NewOrderItemModifier, Order, OrderItem, OrderItemModifier,
    OrderStatus, OrderTotalCalculation, OrderTotals,
};

// =============================================================================
// Requests
// =============================================================================

/// Request to create a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub restaurant_id: String,
    #[serde(default)]
    pub delivery_address_id: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub delivery_street: Option<String>,
    #[serde(default)]
    pub delivery_city: Option<String>,
    #[serde(default)]
    pub delivery_state: Option<String>,
    #[serde(default)]
    pub delivery_postal_code: Option<String>,
    #[serde(default)]
    pub delivery_country: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        NewOrder {
            customer_id: req.customer_id,
            restaurant_id: req.restaurant_id,
            delivery_address_id: req.delivery_address_id,
            payment_method_id: req.payment_method_id,
            delivery_street: req.delivery_street,
            delivery_city: req.delivery_city,
            delivery_state: req.delivery_state,
            delivery_postal_code: req.delivery_postal_code,
            delivery_country: req.delivery_country,
        }
    }
}

/// Request to add a line item to an order.
///
/// The snapshot fields (name, description, unit price) come from the menu
/// catalog read the caller performed; this service stores them frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub order_id: String,
    pub menu_item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<AddItemRequest> for NewOrderItem {
    fn from(req: AddItemRequest) -> Self {
        NewOrderItem {
            order_id: req.order_id,
            menu_item_id: req.menu_item_id,
            item_name: req.item_name,
            item_description: req.item_description,
            quantity: req.quantity,
            unit_price_cents: req.unit_price_cents,
            notes: req.notes,
        }
    }
}

/// Request to update a line item's mutable fields.
///
/// Snapshot fields (name, unit price) are deliberately absent: they are
/// frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to attach a modifier to a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddModifierRequest {
    pub order_item_id: String,
    pub modifier_option_id: String,
    pub modifier_name: String,
    pub option_name: String,
    pub price_delta_cents: i64,
}

impl From<AddModifierRequest> for NewOrderItemModifier {
    fn from(req: AddModifierRequest) -> Self {
        NewOrderItemModifier {
            order_item_id: req.order_item_id,
            modifier_option_id: req.modifier_option_id,
            modifier_name: req.modifier_name,
            option_name: req.option_name,
            price_delta_cents: req.price_delta_cents,
        }
    }
}

/// Request to store a fee breakdown on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTotalsRequest {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    #[serde(default)]
    pub tax_rate_bps: Option<u32>,
    pub delivery_fee_cents: i64,
    pub service_fee_cents: i64,
    pub tip_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl From<UpdateTotalsRequest> for OrderTotals {
    fn from(req: UpdateTotalsRequest) -> Self {
        OrderTotals {
            subtotal_cents: req.subtotal_cents,
            tax_cents: req.tax_cents,
            tax_rate_bps: req.tax_rate_bps,
            delivery_fee_cents: req.delivery_fee_cents,
            service_fee_cents: req.service_fee_cents,
            tip_cents: req.tip_cents,
            discount_cents: req.discount_cents,
            total_cents: req.total_cents,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Order header as returned to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub delivery_address_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub delivery_street: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_country: Option<String>,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tax_rate_bps: Option<u32>,
    pub delivery_fee_cents: i64,
    pub service_fee_cents: i64,
    pub tip_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub is_paid: bool,
    pub created_at: String,
    pub updated_at: String,
    pub confirmed_at: Option<String>,
    pub prepared_at: Option<String>,
    pub ready_at: Option<String>,
    pub picked_up_at: Option<String>,
    pub delivered_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub failed_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            restaurant_id: order.restaurant_id,
            delivery_address_id: order.delivery_address_id,
            payment_method_id: order.payment_method_id,
            delivery_street: order.delivery_street,
            delivery_city: order.delivery_city,
            delivery_state: order.delivery_state,
            delivery_postal_code: order.delivery_postal_code,
            delivery_country: order.delivery_country,
            status: order.status,
            subtotal_cents: order.subtotal_cents,
            tax_cents: order.tax_cents,
            tax_rate_bps: order.tax_rate_bps,
            delivery_fee_cents: order.delivery_fee_cents,
            service_fee_cents: order.service_fee_cents,
            tip_cents: order.tip_cents,
            discount_cents: order.discount_cents,
            total_cents: order.total_cents,
            is_paid: order.is_paid,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            confirmed_at: order.confirmed_at.map(|t| t.to_rfc3339()),
            prepared_at: order.prepared_at.map(|t| t.to_rfc3339()),
            ready_at: order.ready_at.map(|t| t.to_rfc3339()),
            picked_up_at: order.picked_up_at.map(|t| t.to_rfc3339()),
            delivered_at: order.delivered_at.map(|t| t.to_rfc3339()),
            cancelled_at: order.cancelled_at.map(|t| t.to_rfc3339()),
            failed_at: order.failed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Line item as returned to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// `quantity * unit_price_cents`, computed on the way out.
    pub line_total_cents: i64,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let line_total_cents = pricing::line_total(&item).cents();
        OrderItemResponse {
            id: item.id,
            order_id: item.order_id,
            menu_item_id: item.menu_item_id,
            item_name: item.item_name,
            item_description: item.item_description,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents,
            notes: item.notes,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Modifier as returned to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierResponse {
    pub id: String,
    pub order_item_id: String,
    pub modifier_option_id: String,
    pub modifier_name: String,
    pub option_name: String,
    pub price_delta_cents: i64,
    pub created_at: String,
}

impl From<OrderItemModifier> for ModifierResponse {
    fn from(modifier: OrderItemModifier) -> Self {
        ModifierResponse {
            id: modifier.id,
            order_item_id: modifier.order_item_id,
            modifier_option_id: modifier.modifier_option_id,
            modifier_name: modifier.modifier_name,
            option_name: modifier.option_name,
            price_delta_cents: modifier.price_delta_cents,
            created_at: modifier.created_at.to_rfc3339(),
        }
    }
}

/// A line item together with its modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetailResponse {
    #[serde(flatten)]
    pub item: OrderItemResponse,
    pub modifiers: Vec<ModifierResponse>,
    /// Sum of the modifier price deltas.
    pub modifiers_total_cents: i64,
}

/// The full order view: header plus items plus modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemDetailResponse>,
}

/// Result of the subtotal reconciliation query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedSubtotalResponse {
    pub order_id: String,
    /// `SUM(quantity * unit_price_cents)` over the order's items.
    pub calculated_subtotal_cents: i64,
}

impl From<OrderTotalCalculation> for CalculatedSubtotalResponse {
    fn from(calc: OrderTotalCalculation) -> Self {
        CalculatedSubtotalResponse {
            order_id: calc.order_id,
            calculated_subtotal_cents: calc.calculated_subtotal_cents,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
