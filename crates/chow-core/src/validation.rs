//! # Validation Module
//!
//! Input validation for the order core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service layer (chow-orders)                                  │
//! │  └── THIS MODULE: business rule validation before any storage call     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (quantity >= 1)                                             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::OrderTotals;
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LEN, MAX_NOTES_LEN, MAX_TAX_RATE_BPS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order item quantity.
///
/// ## Rules
/// - Must be positive (≥ 1)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a money amount that must not be negative (unit prices, fees,
/// tips, discounts). Zero is allowed (free items, no fee).
///
/// Note: modifier price deltas are exempt — they may legitimately be
/// negative ("no cheese: -$0.50") and are not run through this check.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

/// Validates a caller-supplied fee breakdown: every component must be
/// non-negative, and the tax rate (when present) must be a legal rate.
///
/// The breakdown's internal consistency (sum law) is deliberately NOT
/// checked here; storage trusts caller-supplied totals verbatim.
pub fn validate_totals(totals: &OrderTotals) -> ValidationResult<()> {
    validate_amount_cents("subtotal", totals.subtotal_cents)?;
    validate_amount_cents("tax", totals.tax_cents)?;
    validate_amount_cents("delivery_fee", totals.delivery_fee_cents)?;
    validate_amount_cents("service_fee", totals.service_fee_cents)?;
    validate_amount_cents("tip", totals.tip_cents)?;
    validate_amount_cents("discount", totals.discount_cents)?;
    validate_amount_cents("total", totals.total_cents)?;

    if let Some(bps) = totals.tax_rate_bps {
        validate_tax_rate_bps(bps)?;
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name snapshot.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "item_name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "item_name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates free-text notes.
///
/// ## Rules
/// - May be empty
/// - Must be at most 500 characters
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.len() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("price", 0).is_ok());
        assert!(validate_amount_cents("price", 500).is_ok());
        assert!(validate_amount_cents("price", -100).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(825).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_totals_rejects_negatives() {
        let mut totals = OrderTotals::default();
        assert!(validate_totals(&totals).is_ok());

        totals.discount_cents = -1;
        assert!(validate_totals(&totals).is_err());
    }

    #[test]
    fn test_validate_totals_does_not_enforce_sum_law() {
        // Mismatched but non-negative breakdown passes validation;
        // caller totals are stored verbatim
        let totals = OrderTotals {
            subtotal_cents: 1000,
            tax_cents: 100,
            tax_rate_bps: Some(1000),
            delivery_fee_cents: 200,
            service_fee_cents: 50,
            tip_cents: 100,
            discount_cents: 50,
            total_cents: 9900,
        };
        assert!(validate_totals(&totals).is_ok());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Margherita Pizza").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes("").is_ok());
        assert!(validate_notes("no onions please").is_ok());
        assert!(validate_notes(&"x".repeat(501)).is_err());
    }
}
