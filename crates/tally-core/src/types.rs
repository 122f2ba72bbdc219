//! # Domain Types
//!
//! Core domain types used throughout the discount engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   OrderLine     │   │      Tax        │   │  DiscountRate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (TaxId)     │   │  bps (u32)      │       │
//! │  │  quantity       │   │  name           │   │  1000 = 10%     │       │
//! │  │  unit_price     │   └─────────────────┘   │  10000 = 100%   │       │
//! │  │  discount (bps) │   ┌─────────────────┐   └─────────────────┘       │
//! │  │  tax_ids        │   │   TaxRegistry   │                             │
//! │  └─────────────────┘   │  id → Tax map   │                             │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exact-Set Grouping
//! Discount lines are split per distinct tax-id SET, not per tax id.
//! `TaxSet` is a `BTreeSet`, so the grouping key is canonical and
//! order-independent: {A,B} built as [B,A] equals {A,B} built as [A,B],
//! and {A,B} never merges with {A}.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% off
///
/// The spec-level "fractional percentage ≤ 1.0" maps to `bps ≤ 10_000`.
/// A rate above [`crate::MAX_DISCOUNT_BPS`] is representable but fails
/// validation, so bad input surfaces as an error instead of a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
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

    /// Zero discount rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the rate exceeds 100%.
    #[inline]
    pub const fn exceeds_full(&self) -> bool {
        self.0 > crate::MAX_DISCOUNT_BPS
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Tax Identity
// =============================================================================

/// Identifier of a tax category.
///
/// Opaque to the engine; the host's tax records supply the actual rates.
/// Ord + Hash so sets of tax ids can serve as grouping keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    pub fn new(id: impl Into<String>) -> Self {
        TaxId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of tax categories applied to a line.
///
/// `BTreeSet` gives a canonical, insertion-order-independent key:
/// equality is set equality, which is exactly the grouping rule.
pub type TaxSet = BTreeSet<TaxId>;

/// Builds a [`TaxSet`] from anything yielding id strings.
pub fn tax_set<I, S>(ids: I) -> TaxSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(TaxId::new).collect()
}

// =============================================================================
// Tax & Registry
// =============================================================================

/// A tax category as known to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Identifier used on order lines.
    pub id: TaxId,

    /// Display name shown in discount-line descriptions ("VAT 21%").
    pub name: String,
}

impl Tax {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Tax {
            id: TaxId::new(id),
            name: name.into(),
        }
    }
}

/// Lookup table from tax id to tax record.
///
/// The engine only needs display names from it; rates and jurisdiction
/// rules stay with the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxRegistry {
    taxes: BTreeMap<TaxId, Tax>,
}

impl TaxRegistry {
    pub fn new() -> Self {
        TaxRegistry::default()
    }

    /// Registers a tax, replacing any previous entry with the same id.
    pub fn register(&mut self, tax: Tax) {
        self.taxes.insert(tax.id.clone(), tax);
    }

    /// Returns the display name for a tax id, if known.
    pub fn name_of(&self, id: &TaxId) -> Option<&str> {
        self.taxes.get(id).map(|t| t.name.as_str())
    }

    /// Joins the names of a tax set for description text.
    ///
    /// Unknown ids fall back to the raw id so a stale registry never
    /// hides which taxes a group carries.
    pub fn joined_names(&self, set: &TaxSet) -> String {
        set.iter()
            .map(|id| self.name_of(id).unwrap_or(id.as_str()).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A single priced item entry within a customer order.
///
/// Read-only to the calculator, with one exception: the
/// per-line-percentage discount kind writes the `discount` field of every
/// line (performed by the store applier, never by `compute`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Units ordered. Zero-quantity lines never receive a discount share.
    pub quantity: i64,

    /// Price per unit, before the line's own discount.
    pub unit_price: Money,

    /// The line's own discount, 0–10000 bps (default 0).
    pub discount: DiscountRate,

    /// Tax categories applied to this line (may be empty).
    pub tax_ids: TaxSet,
}

impl OrderLine {
    /// Line subtotal after the line's own discount:
    /// `unit_price × (1 − discount) × quantity`.
    ///
    /// The per-unit price is rounded to a cent before the quantity
    /// multiplication, matching how the line renders on a receipt.
    pub fn discounted_subtotal(&self) -> Money {
        self.unit_price
            .apply_discount(self.discount)
            .multiply_quantity(self.quantity)
    }

    /// Whether this line participates in discount distribution.
    ///
    /// Lines with zero quantity or a zero unit price are skipped, matching
    /// the grouping rule: they contribute nothing to any tax group.
    pub fn contributes(&self) -> bool {
        self.quantity != 0 && !self.unit_price.is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
