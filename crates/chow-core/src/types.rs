//! # Domain Types
//!
//! Core domain types for the order aggregate.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌───────────────────────┐ │
//! │  │     Order       │   │    OrderItem    │   │  OrderItemModifier    │ │
//! │  │  ─────────────  │   │  ─────────────  │   │  ───────────────────  │ │
//! │  │  id (UUID)      │◄──│  order_id (FK)  │◄──│  order_item_id (FK)   │ │
//! │  │  status         │   │  item_name*     │   │  modifier_name*       │ │
//! │  │  totals (cents) │   │  unit_price*    │   │  option_name*         │ │
//! │  │  timestamps     │   │  quantity       │   │  price_delta*         │ │
//! │  └─────────────────┘   └─────────────────┘   └───────────────────────┘ │
//! │                                                                         │
//! │  * snapshot fields: copied from the menu catalog at order time and     │
//! │    never re-read, so later menu edits don't rewrite order history      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an `id` (UUID v4, immutable, used for relations) plus
//! the foreign keys of the aggregate it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. The schema stores tax_rate at four
/// decimal places, which is exactly one basis point of resolution:
/// 0.0825 == 825 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
///
/// ## Lifecycle
/// ```text
/// created → confirmed → preparing → ready → out_for_delivery → delivered
///     │          │          │         │            │
///     └──────────┴──────────┴─────────┴────────────┴──► cancelled / failed
/// ```
///
/// `Created` is the sole state in which line items and modifiers may be
/// mutated. `Delivered`, `Cancelled` and `Failed` are terminal by
/// convention; the machine itself does not reject transitions out of them
/// (see [`crate::status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is being assembled; items and modifiers are editable.
    Created,
    /// Restaurant accepted the order; line items are frozen.
    Confirmed,
    /// Kitchen is working on the order.
    Preparing,
    /// Order is ready for pickup by the courier.
    Ready,
    /// Courier has the order.
    OutForDelivery,
    /// Order reached the customer.
    Delivered,
    /// Order was cancelled.
    Cancelled,
    /// Order failed (payment declined, restaurant unreachable, etc.).
    Failed,
}

impl OrderStatus {
    /// Whether line items and modifiers of an order in this status may be
    /// created, mutated or deleted.
    #[inline]
    pub const fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Created)
    }

    /// Whether this status is a terminal exit of the lifecycle.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Failed
        )
    }

    /// The snake_case wire/storage name of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order placed by a customer against one restaurant.
///
/// The delivery address columns are a snapshot captured at order time,
/// independent of the customer's live address book; `delivery_address_id`
/// is kept only for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,

    /// Address-book reference (traceability only; may be dangling later).
    pub delivery_address_id: Option<String>,
    pub payment_method_id: Option<String>,

    /// Delivery address snapshot.
    pub delivery_street: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_country: Option<String>,

    pub status: OrderStatus,

    /// Money columns, all in cents, all defaulting to 0.
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Tax rate in basis points; nullable when no rate was recorded.
    pub tax_rate_bps: Option<u32>,
    pub delivery_fee_cents: i64,
    pub service_fee_cents: i64,
    pub tip_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,

    pub is_paid: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Lifecycle timestamps, each set at most once, on first entry into the
    /// corresponding status.
    pub confirmed_at: Option<DateTime<Utc>>,
    pub prepared_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the stored subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the stored grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the stored fee breakdown as an [`OrderTotals`] value.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            tax_rate_bps: self.tax_rate_bps,
            delivery_fee_cents: self.delivery_fee_cents,
            service_fee_cents: self.service_fee_cents,
            tip_cents: self.tip_cents,
            discount_cents: self.discount_cents,
            total_cents: self.total_cents,
        }
    }
}

/// Header fields supplied when creating an order.
///
/// Totals are not part of the header: a new order always starts in
/// `created` status with zero totals and no items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: String,
    pub restaurant_id: String,
    pub delivery_address_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub delivery_street: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_country: Option<String>,
}

// =============================================================================
// Order Totals
// =============================================================================

/// The fee breakdown of an order.
///
/// Used both as the input to [`crate::pricing::order_total`] and as the
/// payload of the update-totals operation. The persistence layer stores
/// caller-supplied breakdowns verbatim; consistency with the sum law is the
/// calculator's job, not storage's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tax_rate_bps: Option<u32>,
    pub delivery_fee_cents: i64,
    pub service_fee_cents: i64,
    pub tip_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Result of the reconciliation query: the subtotal derived from the
/// order's items, independent of the stored `subtotal_cents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderTotalCalculation {
    pub order_id: String,
    pub calculated_subtotal_cents: i64,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze menu item data at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Menu item reference (traceability; the menu item may change later).
    pub menu_item_id: String,
    /// Name at order time (frozen).
    pub item_name: String,
    /// Description at order time (frozen).
    pub item_description: Option<String>,
    /// Quantity ordered (≥ 1).
    pub quantity: i64,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    /// Free-text customer notes ("no onions").
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// Fields supplied when adding a line item to an order.
///
/// The snapshot fields (`item_name`, `item_description`,
/// `unit_price_cents`) are provided by the caller, which reads them from
/// the menu catalog at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: String,
    pub menu_item_id: String,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub notes: Option<String>,
}

// =============================================================================
// Order Item Modifier
// =============================================================================

/// A modifier option selected for a line item ("Size: Large, +$1.00").
/// Name, option and price delta are snapshots of the chosen ModifierOption
/// at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItemModifier {
    pub id: String,
    pub order_item_id: String,
    /// Catalog reference (traceability only).
    pub modifier_option_id: String,
    /// Modifier group name at order time (frozen), e.g. "Size".
    pub modifier_name: String,
    /// Chosen option name at order time (frozen), e.g. "Large".
    pub option_name: String,
    /// Price delta in cents at order time (frozen); may be negative.
    pub price_delta_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItemModifier {
    /// Returns the price delta as Money.
    #[inline]
    pub fn price_delta(&self) -> Money {
        Money::from_cents(self.price_delta_cents)
    }
}

/// Fields supplied when attaching a modifier to a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItemModifier {
    pub order_item_id: String,
    pub modifier_option_id: String,
    pub modifier_name: String,
    pub option_name: String,
    pub price_delta_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Created);
    }

    #[test]
    fn test_order_status_editable() {
        assert!(OrderStatus::Created.is_editable());
        assert!(!OrderStatus::Confirmed.is_editable());
        assert!(!OrderStatus::Cancelled.is_editable());
    }

    #[test]
    fn test_order_status_terminal() {
        for status in [
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert!(status.is_terminal());
        }
        for status in [
            OrderStatus::Created,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
        ] {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn test_order_status_wire_names() {
        assert_eq!(OrderStatus::OutForDelivery.as_str(), "out_for_delivery");
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
    }
}
