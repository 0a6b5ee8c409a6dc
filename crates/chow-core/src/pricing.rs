//! # Pricing Calculator
//!
//! Pure functions over order items and fee breakdowns. No side effects: the
//! calling layer is responsible for re-reading items, invoking the
//! calculator, and writing the result back transactionally.
//!
//! ## Conventions
//! - Subtotal is `sum(quantity * unit_price)` over the order's items.
//!   Modifier price deltas are NOT folded into the subtotal; they are
//!   aggregated separately by [`modifiers_total`] and the caller decides
//!   how to combine them.
//! - `total = subtotal + tax + delivery_fee + service_fee + tip - discount`.
//!   Integer cents make the law exact; nothing here rejects negative totals
//!   (validation is the caller's job).

use crate::money::Money;
use crate::types::{OrderItem, OrderItemModifier, OrderTotals};

/// Line total for one item: `quantity * unit_price`.
#[inline]
pub fn line_total(item: &OrderItem) -> Money {
    item.unit_price().multiply_quantity(item.quantity)
}

/// Sum of modifier price deltas for one item.
///
/// Absence of modifiers is not an error; an empty slice totals $0.00.
pub fn modifiers_total(modifiers: &[OrderItemModifier]) -> Money {
    modifiers.iter().map(OrderItemModifier::price_delta).sum()
}

/// Order subtotal: sum of line totals over all items.
pub fn order_subtotal(items: &[OrderItem]) -> Money {
    items.iter().map(line_total).sum()
}

/// Composes the grand total from a fee breakdown:
/// `subtotal + tax + delivery_fee + service_fee + tip - discount`.
///
/// The breakdown's own `total_cents` field is ignored; this function is
/// what produces it.
pub fn order_total(totals: &OrderTotals) -> Money {
    Money::from_cents(totals.subtotal_cents)
        + Money::from_cents(totals.tax_cents)
        + Money::from_cents(totals.delivery_fee_cents)
        + Money::from_cents(totals.service_fee_cents)
        + Money::from_cents(totals.tip_cents)
        - Money::from_cents(totals.discount_cents)
}

/// Whether a stored breakdown satisfies the sum law.
///
/// Storage trusts caller-supplied totals verbatim, so a stored order may
/// legally violate this; the check exists for reconciliation and logging.
pub fn totals_consistent(totals: &OrderTotals) -> bool {
    order_total(totals).cents() == totals.total_cents
}

// =============================================================================
// Unit Tests
// =============================================================================
