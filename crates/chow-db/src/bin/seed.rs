//! # Seed Data Generator
//!
//! Populates the database with demo orders for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 orders (default)
//! cargo run -p chow-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p chow-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p chow-db --bin seed -- --db ./data/chow.db
//! ```
//!
//! ## Generated Orders
//! Each order gets:
//! - 1-4 line items drawn from a small demo menu
//! - Occasional modifiers (some with negative deltas)
//! - A fee breakdown computed with the real calculator
//! - A lifecycle status spread across the full range

use std::env;

use chow_core::money::Money;
use chow_core::pricing;
use chow_core::types::TaxRate;
use chow_core::{NewOrder, NewOrderItem, NewOrderItemModifier, OrderStatus, OrderTotals};
use chow_db::{Database, DbConfig};

/// Demo menu: (name, description, price_cents)
const MENU: &[(&str, &str, i64)] = &[
    ("Margherita Pizza", "Tomato, mozzarella, basil", 1250),
    ("Pepperoni Pizza", "Double pepperoni", 1450),
    ("Cheeseburger", "Beef patty, cheddar, pickles", 899),
    ("Veggie Burger", "Plant-based patty", 949),
    ("Caesar Salad", "Romaine, parmesan, croutons", 750),
    ("Pad Thai", "Rice noodles, peanuts, lime", 1195),
    ("Chicken Tikka Masala", "With basmati rice", 1350),
    ("California Roll", "8 pieces", 850),
    ("Fish Tacos", "Three tacos, slaw, crema", 1050),
    ("Garlic Bread", "With herb butter", 450),
];

/// Demo modifiers: (group, option, delta_cents)
const MODIFIERS: &[(&str, &str, i64)] = &[
    ("Size", "Large", 200),
    ("Size", "Small", -100),
    ("Cheese", "Extra", 100),
    ("Cheese", "None", -50),
    ("Spice", "Hot", 0),
    ("Protein", "Add Chicken", 300),
];

/// Status spread for generated orders
const STATUSES: &[OrderStatus] = &[
    OrderStatus::Created,
    OrderStatus::Created,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Failed,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./chow_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Chow Orders Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of orders to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./chow_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Chow Orders Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Orders:   {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    println!();
    println!("Generating orders...");

    let start = std::time::Instant::now();

    for seed in 0..count {
        let order = db
            .orders()
            .create(&NewOrder {
                customer_id: format!("customer-{:03}", seed % 40),
                restaurant_id: format!("restaurant-{:02}", seed % 8),
                delivery_address_id: None,
                payment_method_id: None,
                delivery_street: Some(format!("{} Demo Street", 1 + seed % 99)),
                delivery_city: Some("Springfield".to_string()),
                delivery_state: Some("IL".to_string()),
                delivery_postal_code: Some("62701".to_string()),
                delivery_country: Some("US".to_string()),
            })
            .await?;

        // 1-4 items per order
        let item_count = 1 + seed % 4;
        let mut modifiers_total = Money::zero();

        for n in 0..item_count {
            let (name, description, price) = MENU[(seed + n * 3) % MENU.len()];

            let item = db
                .order_items()
                .add(&NewOrderItem {
                    order_id: order.id.clone(),
                    menu_item_id: format!("menu-{:02}", (seed + n * 3) % MENU.len()),
                    item_name: name.to_string(),
                    item_description: Some(description.to_string()),
                    quantity: 1 + ((seed + n) % 3) as i64,
                    unit_price_cents: price,
                    notes: if (seed + n) % 5 == 0 {
                        Some("no onions".to_string())
                    } else {
                        None
                    },
                })
                .await?;

            // Roughly every other item gets a modifier
            if (seed + n) % 2 == 0 {
                let (group, option, delta) = MODIFIERS[(seed + n) % MODIFIERS.len()];
                let modifier = db
                    .order_item_modifiers()
                    .add(&NewOrderItemModifier {
                        order_item_id: item.id.clone(),
                        modifier_option_id: format!("opt-{:02}", (seed + n) % MODIFIERS.len()),
                        modifier_name: group.to_string(),
                        option_name: option.to_string(),
                        price_delta_cents: delta,
                    })
                    .await?;
                modifiers_total += modifier.price_delta();
            }
        }

        // Compute a consistent fee breakdown with the real calculator
        let calc = db.orders().calculate_subtotal(&order.id).await?;
        let subtotal = Money::from_cents(calc.calculated_subtotal_cents) + modifiers_total;
        let tax_rate = TaxRate::from_bps(825);
        let tax = subtotal.calculate_tax(tax_rate);

        let mut totals = OrderTotals {
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            tax_rate_bps: Some(tax_rate.bps()),
            delivery_fee_cents: 299,
            service_fee_cents: 150,
            tip_cents: ((seed % 5) as i64) * 100,
            discount_cents: if seed % 10 == 0 { 200 } else { 0 },
            total_cents: 0,
        };
        totals.total_cents = pricing::order_total(&totals).cents();

        db.orders().update_totals(&order.id, &totals).await?;

        // Walk the order to its target status
        let target = STATUSES[seed % STATUSES.len()];
        if target != OrderStatus::Created {
            db.orders().update_status(&order.id, target).await?;
        }
        if matches!(
            target,
            OrderStatus::Delivered | OrderStatus::OutForDelivery
        ) {
            db.orders().set_paid(&order.id, true).await?;
        }

        if (seed + 1) % 50 == 0 {
            println!("  Generated {} orders...", seed + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} orders in {:?}", count, elapsed);

    // Quick sanity checks over the generated data
    println!();
    println!("Verifying...");
    let delivered = db.orders().list_by_status(OrderStatus::Delivered).await?;
    println!("  Delivered orders: {}", delivered.len());
    let active = db.orders().list_active_by_customer("customer-000").await?;
    println!("  Active orders for customer-000: {}", active.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
