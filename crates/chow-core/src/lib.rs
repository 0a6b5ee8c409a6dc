//! # chow-core: Pure Business Logic for Chow Orders
//!
//! This crate is the **heart** of the order platform. It contains all order
//! lifecycle and pricing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Chow Orders Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  chow-orders (Service Layer)                    │   │
//! │  │    create_order, add_item, update_status, calculate_total      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ chow-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  status   │  │   │
//! │  │   │   Order   │  │   Money   │  │ subtotal  │  │ lifecycle │  │   │
//! │  │   │ OrderItem │  │  TaxCalc  │  │   total   │  │timestamps │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    chow-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderItem, OrderItemModifier, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Subtotal / total calculators
//! - [`status`] - Status machine and lifecycle timestamp rules
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chow_core::money::Money;
//! use chow_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(1350); // $13.50
//!
//! // Tax rates are basis points: 8.25% = 825 bps
//! let tax_rate = TaxRate::from_bps(825);
//! let tax = subtotal.calculate_tax(tax_rate);
//!
//! // Tax on $13.50 at 8.25% = $1.11 (rounded)
//! assert_eq!(tax.cents(), 111);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use chow_core::Money` instead of
// `use chow_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Can be made configurable per-restaurant in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length for item / modifier name snapshots
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length for free-text notes on a line item
pub const MAX_NOTES_LEN: usize = 500;

/// Maximum tax rate in basis points (100%)
pub const MAX_TAX_RATE_BPS: u32 = 10_000;
