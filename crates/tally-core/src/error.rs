//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── ValidationError  - Discount spec / line input failures            │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Missing configuration, unknown records         │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → host application → user          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (bps, quantity, etc.)
//! 3. Errors are enum variants, never String
//! 4. Both error kinds are terminal for the invocation: no retry, no
//!    fallback discount product

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur before any record is created or mutated, so a failed
/// validation leaves the order exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Discount percentage exceeds 100% (10,000 basis points).
    ///
    /// ## When This Occurs
    /// - A per-line or global percentage spec carries a rate above 1.0
    ///   (e.g. a cashier typed 150 instead of 15)
    ///
    /// Fixed-amount specs are exempt: their internal ratio is a split key,
    /// not a user-facing rate.
    #[error("Invalid discount amount")]
    InvalidDiscountAmount { bps: u32 },

    /// Order line quantity is negative.
    #[error("quantity must be zero or positive, got {quantity}")]
    NegativeQuantity { quantity: i64 },

    /// A line's own discount field is outside 0..=100%.
    #[error("line discount must be between 0 and 10000 bps, got {bps}")]
    LineDiscountOutOfRange { bps: u32 },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
