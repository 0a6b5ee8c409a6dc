//! # Order Status Machine
//!
//! Validates nothing, records everything: the machine applies a requested
//! status unconditionally (matching the behavior of the storage UPDATE it
//! models) and its single real job is the timestamp rule — when an order
//! enters a status for the first time, the matching lifecycle timestamp is
//! stamped, and a repeated entry into the same status must never overwrite
//! it.
//!
//! ## Status → timestamp mapping
//! ```text
//! confirmed        → confirmed_at
//! preparing        → prepared_at
//! ready            → ready_at
//! out_for_delivery → picked_up_at
//! delivered        → delivered_at
//! cancelled        → cancelled_at
//! failed           → failed_at
//! created          → (none; created_at is set at insert and immutable)
//! ```
//!
//! No forward/backward ordering is enforced: an order may jump from
//! `created` straight to `delivered`, in which case only `delivered_at`
//! gets stamped and the intermediate timestamps stay null.

use chrono::{DateTime, Utc};

use crate::types::{Order, OrderStatus};

/// The database column stamped on first entry into `status`, or `None` for
/// `Created` (whose timestamp is the immutable `created_at`).
///
/// Shared with the persistence layer so the SQL UPDATE and the in-memory
/// [`transition`] agree on the mapping.
pub const fn entry_timestamp_column(status: OrderStatus) -> Option<&'static str> {
    match status {
        OrderStatus::Created => None,
        OrderStatus::Confirmed => Some("confirmed_at"),
        OrderStatus::Preparing => Some("prepared_at"),
        OrderStatus::Ready => Some("ready_at"),
        OrderStatus::OutForDelivery => Some("picked_up_at"),
        OrderStatus::Delivered => Some("delivered_at"),
        OrderStatus::Cancelled => Some("cancelled_at"),
        OrderStatus::Failed => Some("failed_at"),
    }
}

/// Applies a status transition to an in-memory order.
///
/// Sets `status` unconditionally, bumps `updated_at`, and stamps the
/// status's lifecycle timestamp only if it is still unset (at-most-once
/// rule).
pub fn transition(order: &mut Order, new_status: OrderStatus, now: DateTime<Utc>) {
    order.status = new_status;
    order.updated_at = now;

    let slot = match new_status {
        OrderStatus::Created => return,
        OrderStatus::Confirmed => &mut order.confirmed_at,
        OrderStatus::Preparing => &mut order.prepared_at,
        OrderStatus::Ready => &mut order.ready_at,
        OrderStatus::OutForDelivery => &mut order.picked_up_at,
        OrderStatus::Delivered => &mut order.delivered_at,
        OrderStatus::Cancelled => &mut order.cancelled_at,
        OrderStatus::Failed => &mut order.failed_at,
    };

    if slot.is_none() {
        *slot = Some(now);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn blank_order() -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".to_string(),
            customer_id: "c-1".to_string(),
            restaurant_id: "r-1".to_string(),
            delivery_address_id: None,
            payment_method_id: None,
            delivery_street: None,
            delivery_city: None,
            delivery_state: None,
            delivery_postal_code: None,
            delivery_country: None,
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
        }
    }

    #[test]
    fn test_first_entry_stamps_timestamp() {
        let mut order = blank_order();
        let t1 = Utc::now();

        transition(&mut order, OrderStatus::Confirmed, t1);

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.confirmed_at, Some(t1));
        assert_eq!(order.updated_at, t1);
    }

    #[test]
    fn test_reentry_does_not_overwrite_timestamp() {
        let mut order = blank_order();
        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(60);

        transition(&mut order, OrderStatus::Confirmed, t1);
        transition(&mut order, OrderStatus::Preparing, t1);
        transition(&mut order, OrderStatus::Confirmed, t2);

        // Re-entered confirmed: status moved, timestamp kept from first entry
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.confirmed_at, Some(t1));
        assert_eq!(order.updated_at, t2);
    }

    #[test]
    fn test_direct_to_delivered_skips_intermediate_stamps() {
        let mut order = blank_order();
        let t1 = Utc::now();

        transition(&mut order, OrderStatus::Delivered, t1);

        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.delivered_at, Some(t1));
        assert_eq!(order.confirmed_at, None);
        assert_eq!(order.prepared_at, None);
        assert_eq!(order.ready_at, None);
        assert_eq!(order.picked_up_at, None);
    }

    #[test]
    fn test_cancelled_and_failed_stamp_their_slots() {
        let t1 = Utc::now();

        let mut order = blank_order();
        transition(&mut order, OrderStatus::Cancelled, t1);
        assert_eq!(order.cancelled_at, Some(t1));

        let mut order = blank_order();
        transition(&mut order, OrderStatus::Failed, t1);
        assert_eq!(order.failed_at, Some(t1));
    }

    #[test]
    fn test_back_to_created_stamps_nothing() {
        let mut order = blank_order();
        let created_at = order.created_at;
        let t1 = Utc::now() + Duration::seconds(5);

        transition(&mut order, OrderStatus::Confirmed, t1);
        transition(&mut order, OrderStatus::Created, t1);

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.created_at, created_at);
    }

    #[test]
    fn test_timestamp_column_mapping() {
        assert_eq!(entry_timestamp_column(OrderStatus::Created), None);
        assert_eq!(
            entry_timestamp_column(OrderStatus::OutForDelivery),
            Some("picked_up_at")
        );
        assert_eq!(
            entry_timestamp_column(OrderStatus::Failed),
            Some("failed_at")
        );
    }
}
