//! # Discount Applier
//!
//! Turns a computed [`DiscountOutcome`] into record effects, inside the
//! caller's transactional boundary.
//!
//! ## Application Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    apply_discount() Flow                                │
//! │                                                                         │
//! │  load order + lines + taxes                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tally_core::compute()  ──ValidationError──►  fail, nothing touched    │
//! │       │                                                                 │
//! │       ├── SetLineDiscount ──► write discount field of every line       │
//! │       │                                                                 │
//! │       ├── Lines([])       ──► no-op, no records created                │
//! │       │                                                                 │
//! │       └── Lines(v)        ──► resolve/create discount product          │
//! │                               └──► create one line record per entry    │
//! │                                                                         │
//! │  The product is resolved only once lines will actually be emitted,     │
//! │  so a no-op never creates configuration as a side effect.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tally_core::{compute, DiscountContext, DiscountOutcome, DiscountSpec, Money};

use crate::access::AccessPolicy;
use crate::error::StoreResult;
use crate::store::InMemoryStore;

/// What applying a discount did to the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AppliedDiscount {
    /// Per-line branch: existing lines' discount fields were written.
    LinesDiscounted { lines_updated: usize },

    /// Generated discount line records were attached to the order.
    LinesCreated { line_ids: Vec<String> },

    /// Nothing to do (zero total fixed amount, or no eligible lines).
    NoOp,
}

/// Applies a discount spec to an order.
///
/// The order total handed to the calculator is the sum of the current
/// lines' discounted subtotals; hosts tracking a tax-inclusive total can
/// call [`tally_core::compute`] directly with their own figure.
///
/// ## Side Effects
/// - per-line kind: in-place mutation of every line's discount field
/// - otherwise: lazily created discount product (first use only) plus one
///   created line record per tax group
///
/// All effects happen within this call; validation runs before the first
/// mutation, so a failure leaves the order untouched.
///
/// ## Errors
/// - [`crate::StoreError::Validation`] for a percentage above 100%
/// - [`crate::StoreError::MissingConfiguration`] when no discount product
///   exists and the policy forbids creating one
/// - [`crate::StoreError::NotFound`] for an unknown order id
pub fn apply_discount(
    store: &InMemoryStore,
    policy: &dyn AccessPolicy,
    order_id: &str,
    spec: &DiscountSpec,
    percent_decimals: u32,
) -> StoreResult<AppliedDiscount> {
    let order = store.order(order_id)?;
    let records = store.order_lines(order_id)?;
    let lines: Vec<_> = records.iter().map(|r| r.to_order_line()).collect();
    let registry = store.tax_registry();

    let order_total = lines
        .iter()
        .fold(Money::zero(), |acc, l| acc + l.discounted_subtotal());

    let ctx = DiscountContext {
        order_total,
        percent_decimals,
        taxes: &registry,
    };

    match compute(&lines, spec, &ctx)? {
        DiscountOutcome::SetLineDiscount { rate } => {
            let lines_updated = store.write_line_discount(order_id, rate)?;
            info!(order_id = %order_id, lines_updated, bps = rate.bps(), "applied per-line discount");
            Ok(AppliedDiscount::LinesDiscounted { lines_updated })
        }
        DiscountOutcome::Lines(discount_lines) if discount_lines.is_empty() => {
            debug!(order_id = %order_id, "discount is a no-op");
            Ok(AppliedDiscount::NoOp)
        }
        DiscountOutcome::Lines(discount_lines) => {
            let product = store.resolve_or_create_discount_product(&order.company_id, policy)?;
            let created = store.append_discount_lines(order_id, &product, &discount_lines)?;
            info!(
                order_id = %order_id,
                lines_created = created.len(),
                product_id = %product.id,
                "applied discount lines"
            );
            Ok(AppliedDiscount::LinesCreated {
                line_ids: created.into_iter().map(|r| r.id).collect(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
