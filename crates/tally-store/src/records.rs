//! # Record Types
//!
//! The records the discount applier reads and writes, shaped the way the
//! host application's record system shapes them.
//!
//! ## Record Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store Records                                   │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │  CompanyRecord  │        │  ProductRecord  │                        │
//! │  │  ─────────────  │  lazy  │  ─────────────  │                        │
//! │  │  id             │───────►│  id             │                        │
//! │  │  discount_      │  slot  │  kind: Service  │                        │
//! │  │  product_id     │        │  list_price: 0  │                        │
//! │  └────────┬────────┘        └─────────────────┘                        │
//! │           │                          ▲                                  │
//! │  ┌────────▼────────┐        ┌────────┴────────┐                        │
//! │  │   OrderRecord   │ 1 ── * │ OrderLineRecord │                        │
//! │  │  id, company_id │        │  qty, price,    │                        │
//! │  └─────────────────┘        │  discount, taxes│                        │
//! │                             └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record carries a UUID v4 id and a created_at stamp; the store
//! assigns both at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::{DiscountRate, Money, OrderLine, TaxSet};

// =============================================================================
// Product Record
// =============================================================================

/// Catalog entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Physical stock-tracked goods.
    Goods,
    /// Service entries; the discount product is always one of these.
    Service,
}

/// When a product is invoiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePolicy {
    /// Invoice on ordered quantities (the discount product's policy).
    Order,
    /// Invoice on delivered quantities.
    Delivery,
}

/// A catalog entry.
///
/// The lazily created discount product is a `ProductRecord` with
/// service kind, zero list price, no taxes, and the services category
/// when the store has one configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Company this product belongs to.
    pub company_id: String,

    /// Display name ("Discount" for the discount product).
    pub name: String,

    pub kind: ProductKind,

    pub invoice_policy: InvoicePolicy,

    /// Catalog price; zero for the discount product (the discount line
    /// itself carries the amount).
    pub list_price: Money,

    /// Default taxes; empty for the discount product so group taxes from
    /// the split are the only ones attached.
    pub tax_ids: TaxSet,

    /// Category id, if the store knows a services category.
    pub category: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Company Record
// =============================================================================

/// A company, carrying the per-company discount-product slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    /// Process-wide shared configuration: the discount product used to tag
    /// generated lines. Filled on first use, never silently replaced.
    pub discount_product_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order & Line Records
// =============================================================================

/// A customer order. Lines are stored alongside, keyed by this id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub company_id: String,

    pub created_at: DateTime<Utc>,
}

/// A line item record within an order.
///
/// Ordinary lines reference a real product (or none, for notes typed by a
/// cashier); generated discount lines reference the discount product and
/// carry the high discount sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub order_id: String,

    /// Product this line sells, when any.
    pub product_id: Option<String>,

    /// Description shown on the order; discount lines carry the generated
    /// text here.
    pub description: Option<String>,

    pub quantity: i64,

    /// Unit price; negative on discount lines.
    pub unit_price: Money,

    /// The line's own discount field (bps). Written in place by the
    /// per-line-percentage branch.
    pub discount: DiscountRate,

    pub tax_ids: TaxSet,

    /// Sort order. Ordinary lines count up in tens; discount lines use
    /// [`tally_core::DISCOUNT_LINE_SEQUENCE`].
    pub sequence: u32,

    pub created_at: DateTime<Utc>,
}

impl OrderLineRecord {
    /// Projects this record into the calculator's read-only line view.
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            id: self.id.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            tax_ids: self.tax_ids.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::tax_set;

    #[test]
    fn test_record_projects_to_order_line() {
        let record = OrderLineRecord {
            id: "line-1".to_string(),
            order_id: "order-1".to_string(),
            product_id: Some("prod-1".to_string()),
            description: Some("Espresso".to_string()),
            quantity: 2,
            unit_price: Money::from_cents(350),
            discount: DiscountRate::from_bps(500),
            tax_ids: tax_set(["vat-std"]),
            sequence: 10,
            created_at: Utc::now(),
        };

        let line = record.to_order_line();
        assert_eq!(line.id, "line-1");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price.cents(), 350);
        assert_eq!(line.discount.bps(), 500);
        assert_eq!(line.tax_ids, tax_set(["vat-std"]));
    }
}
