//! # tally-core: Pure Discount Logic for Tally POS
//!
//! This crate is the **heart** of the discount engine. It contains the
//! discount distribution algorithm as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Tally Discount Engine Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Host Application                            │   │
//! │  │   order UI ──► discount wizard ──► transaction boundary         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ discount  │  │ validation│  │   │
//! │  │   │ OrderLine │  │   Money   │  │ compute() │  │   rules   │  │   │
//! │  │   │ TaxSet    │  │ Rate math │  │ grouping  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO RECORD MUTATION • PURE FUNCTIONS   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-store (Record Collaborator)               │   │
//! │  │        product resolution, line creation, per-line writes       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (OrderLine, Tax, TaxRegistry, DiscountRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`discount`] - The discount distribution algorithm
//! - [`error`] - Typed validation errors
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `compute` is deterministic - same input = same output
//! 2. **No I/O**: Record stores, files, networks are FORBIDDEN here
//! 3. **Integer Money**: Cents (i64) and basis points (u32), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::discount::{compute, DiscountContext, DiscountKind, DiscountSpec};
//! use tally_core::money::Money;
//! use tally_core::types::{tax_set, DiscountRate, OrderLine, TaxRegistry};
//!
//! let lines = vec![OrderLine {
//!     id: "l1".into(),
//!     quantity: 2,
//!     unit_price: Money::from_cents(4_950),
//!     discount: DiscountRate::zero(),
//!     tax_ids: tax_set(["vat-std"]),
//! }];
//!
//! let registry = TaxRegistry::new();
//! let ctx = DiscountContext {
//!     order_total: Money::from_cents(9_900),
//!     percent_decimals: 2,
//!     taxes: &registry,
//! };
//!
//! let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
//!     rate: DiscountRate::from_bps(1_000), // 10%
//! });
//!
//! let outcome = compute(&lines, &spec, &ctx).unwrap();
//! assert!(!outcome.is_noop());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use discount::{
    compute, DiscountContext, DiscountKind, DiscountLine, DiscountOutcome, DiscountSpec,
};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sort order assigned to generated discount lines.
///
/// ## Why 999?
/// Ordinary lines get small sequence numbers as they are entered; a high
/// constant keeps every discount line after them without renumbering.
pub const DISCOUNT_LINE_SEQUENCE: u32 = 999;

/// Maximum discount rate: 10,000 basis points = 100%.
///
/// ## Business Reason
/// A percentage discount above 100% turns a sale into a payout; validation
/// rejects it before anything touches the order.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;
