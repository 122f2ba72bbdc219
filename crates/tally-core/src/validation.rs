//! # Validation Module
//!
//! Input validation for discount specs and order lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host UI                                                      │
//! │  ├── Basic format checks (empty, non-numeric)                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (inside compute / store insertion)               │
//! │  ├── Percentage-based specs capped at 100%                             │
//! │  └── Line quantities and line discounts in range                       │
//! │                                                                         │
//! │  A failed validation happens before any record mutation, so there is   │
//! │  never a partially applied discount to roll back.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::discount::DiscountSpec;
use crate::error::{ValidationError, ValidationResult};
use crate::types::OrderLine;
use crate::MAX_DISCOUNT_BPS;

/// Validates a discount spec.
///
/// ## Rules
/// - Percentage-based kinds (per-line, global) must not exceed 100%
///   (10,000 bps)
/// - Fixed amounts are exempt: their internal split ratio is not a rate
///
/// ## Example
/// ```rust
/// use tally_core::discount::{DiscountKind, DiscountSpec};
/// use tally_core::types::DiscountRate;
/// use tally_core::validation::validate_spec;
///
/// let ok = DiscountSpec::new(DiscountKind::GlobalPercentage {
///     rate: DiscountRate::from_bps(2_500),
/// });
/// assert!(validate_spec(&ok).is_ok());
///
/// let over = DiscountSpec::new(DiscountKind::GlobalPercentage {
///     rate: DiscountRate::from_bps(15_000),
/// });
/// assert!(validate_spec(&over).is_err());
/// ```
pub fn validate_spec(spec: &DiscountSpec) -> ValidationResult<()> {
    use crate::discount::DiscountKind::*;

    if let PerLinePercentage { rate } | GlobalPercentage { rate } = spec.kind {
        if rate.exceeds_full() {
            return Err(ValidationError::InvalidDiscountAmount { bps: rate.bps() });
        }
    }

    Ok(())
}

/// Validates an order line before it enters the store.
///
/// ## Rules
/// - Quantity must be zero or positive
/// - The line's own discount must be 0..=10,000 bps
pub fn validate_order_line(line: &OrderLine) -> ValidationResult<()> {
    if line.quantity < 0 {
        return Err(ValidationError::NegativeQuantity {
            quantity: line.quantity,
        });
    }

    if line.discount.bps() > MAX_DISCOUNT_BPS {
        return Err(ValidationError::LineDiscountOutOfRange {
            bps: line.discount.bps(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
