//! End-to-end tests for the order service against an in-memory database.

use chow_core::OrderStatus;
use chow_db::{Database, DbConfig};
use chow_orders::{
    AddItemRequest, AddModifierRequest, CreateOrderRequest, ErrorCode, OrderService,
    UpdateItemRequest, UpdateTotalsRequest,
};

async fn service() -> OrderService {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    OrderService::new(db)
}

fn create_request() -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id: "cust-1".to_string(),
        restaurant_id: "rest-1".to_string(),
        delivery_address_id: Some("addr-1".to_string()),
        payment_method_id: None,
        delivery_street: Some("1 Main St".to_string()),
        delivery_city: Some("Springfield".to_string()),
        delivery_state: Some("IL".to_string()),
        delivery_postal_code: Some("62701".to_string()),
        delivery_country: Some("US".to_string()),
    }
}

fn item_request(order_id: &str, name: &str, quantity: i64, unit_price_cents: i64) -> AddItemRequest {
    AddItemRequest {
        order_id: order_id.to_string(),
        menu_item_id: "menu-1".to_string(),
        item_name: name.to_string(),
        item_description: None,
        quantity,
        unit_price_cents,
        notes: None,
    }
}

fn modifier_request(item_id: &str, delta: i64) -> AddModifierRequest {
    AddModifierRequest {
        order_item_id: item_id.to_string(),
        modifier_option_id: "opt-1".to_string(),
        modifier_name: "Size".to_string(),
        option_name: "Large".to_string(),
        price_delta_cents: delta,
    }
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_full_order_lifecycle() {
    let svc = service().await;

    // Create: starts in created status with zero totals
    let order = svc.create_order(create_request()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.total_cents, 0);
    assert!(!order.is_paid);

    // Build the cart: 2 × $5.00 + 1 × $3.50 = $13.50
    let pizza = svc
        .add_item(item_request(&order.id, "Pizza", 2, 500))
        .await
        .unwrap();
    assert_eq!(pizza.line_total_cents, 1000);
    svc.add_item(item_request(&order.id, "Salad", 1, 350))
        .await
        .unwrap();

    let calc = svc.calculate_subtotal(&order.id).await.unwrap();
    assert_eq!(calc.calculated_subtotal_cents, 1350);

    // Store the fee breakdown
    let order = svc
        .update_totals(
            &order.id,
            UpdateTotalsRequest {
                subtotal_cents: 1350,
                tax_cents: 111,
                tax_rate_bps: Some(825),
                delivery_fee_cents: 299,
                service_fee_cents: 150,
                tip_cents: 200,
                discount_cents: 0,
                total_cents: 2110,
            },
        )
        .await
        .unwrap();
    assert_eq!(order.total_cents, 2110);

    // Progress through the lifecycle; each timestamp stamped on entry
    let order = svc
        .update_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert!(order.confirmed_at.is_some());

    let order = svc
        .update_status(&order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert!(order.prepared_at.is_some());

    let order = svc
        .update_status(&order.id, OrderStatus::OutForDelivery)
        .await
        .unwrap();
    assert!(order.picked_up_at.is_some());
    assert!(order.ready_at.is_none()); // skipped, stays null

    let order = svc.mark_paid(&order.id, true).await.unwrap();
    assert!(order.is_paid);

    let order = svc
        .update_status(&order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn test_get_order_composes_items_and_modifiers() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();

    let burger = svc
        .add_item(item_request(&order.id, "Burger", 1, 899))
        .await
        .unwrap();
    svc.add_modifier(modifier_request(&burger.id, 100))
        .await
        .unwrap();
    svc.add_modifier(modifier_request(&burger.id, -50))
        .await
        .unwrap();
    svc.add_item(item_request(&order.id, "Fries", 2, 350))
        .await
        .unwrap();

    let detail = svc.get_order(&order.id).await.unwrap();
    assert_eq!(detail.items.len(), 2);

    let burger_detail = detail
        .items
        .iter()
        .find(|i| i.item.id == burger.id)
        .unwrap();
    assert_eq!(burger_detail.modifiers.len(), 2);
    assert_eq!(burger_detail.modifiers_total_cents, 50);

    let fries_detail = detail
        .items
        .iter()
        .find(|i| i.item.item_name == "Fries")
        .unwrap();
    assert!(fries_detail.modifiers.is_empty());
    assert_eq!(fries_detail.modifiers_total_cents, 0);
    assert_eq!(fries_detail.item.line_total_cents, 700);
}

// =============================================================================
// Mutability Guard
// =============================================================================

#[tokio::test]
async fn test_items_frozen_after_confirmation() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    let item = svc
        .add_item(item_request(&order.id, "Pizza", 1, 500))
        .await
        .unwrap();
    svc.update_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();

    let err = svc
        .add_item(item_request(&order.id, "Salad", 1, 350))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    let err = svc
        .update_item(
            &item.id,
            UpdateItemRequest {
                quantity: 5,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    let err = svc.remove_item(&item.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    let err = svc
        .add_modifier(modifier_request(&item.id, 100))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    let err = svc.clear_items(&order.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    // Nothing changed
    let detail = svc.get_order(&order.id).await.unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].item.quantity, 1);
}

#[tokio::test]
async fn test_modifiers_frozen_after_cancellation() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    let item = svc
        .add_item(item_request(&order.id, "Pizza", 1, 500))
        .await
        .unwrap();
    let modifier = svc
        .add_modifier(modifier_request(&item.id, 100))
        .await
        .unwrap();

    svc.cancel_order(&order.id).await.unwrap();

    let err = svc.remove_modifier(&modifier.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);

    let err = svc.clear_modifiers(&item.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PreconditionFailed);
}

// =============================================================================
// Status Machine
// =============================================================================

#[tokio::test]
async fn test_timestamps_are_idempotent() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();

    let first = svc
        .update_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    let stamp = first.confirmed_at.clone().unwrap();

    svc.update_status(&order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    let reentered = svc
        .update_status(&order.id, OrderStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(reentered.status, OrderStatus::Confirmed);
    assert_eq!(reentered.confirmed_at.unwrap(), stamp);
}

#[tokio::test]
async fn test_cancel_and_fail_stamp_timestamps() {
    let svc = service().await;

    let order = svc.create_order(create_request()).await.unwrap();
    let cancelled = svc.cancel_order(&order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let order = svc.create_order(create_request()).await.unwrap();
    let failed = svc
        .update_status(&order.id, OrderStatus::Failed)
        .await
        .unwrap();
    assert!(failed.failed_at.is_some());
}

#[tokio::test]
async fn test_update_status_unknown_order() {
    let svc = service().await;
    let err = svc
        .update_status("missing", OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_item_validation() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();

    // Zero quantity
    let err = svc
        .add_item(item_request(&order.id, "Pizza", 0, 500))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Quantity over the cap
    let err = svc
        .add_item(item_request(&order.id, "Pizza", 1000, 500))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Negative unit price
    let err = svc
        .add_item(item_request(&order.id, "Pizza", 1, -500))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Blank name
    let err = svc
        .add_item(item_request(&order.id, "   ", 1, 500))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_negative_modifier_delta_is_legal() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    let item = svc
        .add_item(item_request(&order.id, "Burger", 1, 899))
        .await
        .unwrap();

    // "no cheese: -$0.50"
    let modifier = svc
        .add_modifier(modifier_request(&item.id, -50))
        .await
        .unwrap();
    assert_eq!(modifier.price_delta_cents, -50);
}

#[tokio::test]
async fn test_totals_validation_rejects_negative_components() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();

    let err = svc
        .update_totals(
            &order.id,
            UpdateTotalsRequest {
                subtotal_cents: 1000,
                tax_cents: 80,
                tax_rate_bps: Some(800),
                delivery_fee_cents: -299,
                service_fee_cents: 0,
                tip_cents: 0,
                discount_cents: 0,
                total_cents: 781,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_inconsistent_totals_stored_verbatim() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();

    // Sum law says 1080, caller claims 9999; stored as-is (warning logged)
    let order = svc
        .update_totals(
            &order.id,
            UpdateTotalsRequest {
                subtotal_cents: 1000,
                tax_cents: 80,
                tax_rate_bps: Some(800),
                delivery_fee_cents: 0,
                service_fee_cents: 0,
                tip_cents: 0,
                discount_cents: 0,
                total_cents: 9999,
            },
        )
        .await
        .unwrap();
    assert_eq!(order.total_cents, 9999);
}

#[tokio::test]
async fn test_create_order_requires_ids() {
    let svc = service().await;
    let mut req = create_request();
    req.customer_id = "".to_string();

    let err = svc.create_order(req).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

// =============================================================================
// Item / Modifier Management
// =============================================================================

#[tokio::test]
async fn test_clear_items_and_modifiers() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    let item = svc
        .add_item(item_request(&order.id, "Burger", 1, 899))
        .await
        .unwrap();
    svc.add_modifier(modifier_request(&item.id, 100))
        .await
        .unwrap();
    svc.add_modifier(modifier_request(&item.id, 200))
        .await
        .unwrap();

    let removed = svc.clear_modifiers(&item.id).await.unwrap();
    assert_eq!(removed, 2);

    svc.add_item(item_request(&order.id, "Fries", 1, 350))
        .await
        .unwrap();
    let removed = svc.clear_items(&order.id).await.unwrap();
    assert_eq!(removed, 2);

    let calc = svc.calculate_subtotal(&order.id).await.unwrap();
    assert_eq!(calc.calculated_subtotal_cents, 0);
}

#[tokio::test]
async fn test_update_item_quantity_recalculates_line_total() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    let item = svc
        .add_item(item_request(&order.id, "Pizza", 1, 500))
        .await
        .unwrap();

    let updated = svc.update_item_quantity(&item.id, 4).await.unwrap();
    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.line_total_cents, 2000);
    // Snapshot price untouched
    assert_eq!(updated.unit_price_cents, 500);
}

#[tokio::test]
async fn test_delete_order_cascades() {
    let svc = service().await;
    let order = svc.create_order(create_request()).await.unwrap();
    svc.add_item(item_request(&order.id, "Pizza", 1, 500))
        .await
        .unwrap();

    svc.delete_order(&order.id).await.unwrap();

    let err = svc.get_order(&order.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_operations() {
    let svc = service().await;

    let a = svc.create_order(create_request()).await.unwrap();
    let b = svc.create_order(create_request()).await.unwrap();
    svc.update_status(&b.id, OrderStatus::Delivered)
        .await
        .unwrap();

    let all = svc.list_customer_orders("cust-1").await.unwrap();
    assert_eq!(all.len(), 2);

    let active = svc.list_active_orders("cust-1").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a.id);

    let delivered = svc
        .list_orders_by_status(OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.len(), 1);

    let by_restaurant = svc.list_restaurant_orders("rest-1").await.unwrap();
    assert_eq!(by_restaurant.len(), 2);

    assert!(svc.list_customer_orders("other").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restaurant_queue_and_date_range() {
    let svc = service().await;

    let first = svc.create_order(create_request()).await.unwrap();
    let second = svc.create_order(create_request()).await.unwrap();
    let draft = svc.create_order(create_request()).await.unwrap();

    svc.update_status(&first.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    svc.update_status(&second.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    svc.update_status(&second.id, OrderStatus::Preparing)
        .await
        .unwrap();

    // Kitchen queue: confirmed/preparing only, oldest confirmation first
    let queue = svc.list_active_restaurant_orders("rest-1").await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id, first.id);
    assert_eq!(queue[1].id, second.id);
    assert!(!queue.iter().any(|o| o.id == draft.id));

    let now = chrono::Utc::now();
    let hour = chrono::Duration::hours(1);

    let recent = svc
        .list_orders_by_date_range(now - hour, now + hour)
        .await
        .unwrap();
    assert_eq!(recent.len(), 3);

    let last_week = svc
        .list_orders_by_date_range(now - hour * 72, now - hour * 48)
        .await
        .unwrap();
    assert!(last_week.is_empty());
}
