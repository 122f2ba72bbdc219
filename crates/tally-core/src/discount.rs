//! # Discount Computation
//!
//! The discount distribution algorithm: given an order's lines and a
//! discount specification, produce the adjustment lines that realize the
//! requested discount.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute() Data Flow                                │
//! │                                                                         │
//! │  DiscountSpec ──► validate ──► per-line kind? ──► SetLineDiscount      │
//! │                      │              no                                  │
//! │                      ▼                                                  │
//! │  OrderLines ──► group by exact tax set ──► subtotal per group          │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  effective rate ──► one DiscountLine per group (negative amount)       │
//! │                                                                         │
//! │  NO side effects here: record creation and line mutation belong to     │
//! │  tally-store, inside the caller's transaction.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Three Kinds
//! - **PerLinePercentage**: short-circuit. No lines are generated; the
//!   applier writes the rate into every order line's own discount field.
//! - **GlobalPercentage**: the rate is applied to each tax group's subtotal.
//! - **FixedAmount**: the amount is split across tax groups proportionally
//!   to their subtotals. The internal ratio is a split key, not a
//!   user-facing rate, which is why multi-group descriptions omit it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::money::Money;
use crate::types::{DiscountRate, OrderLine, TaxRegistry, TaxSet};
use crate::validation::validate_spec;
use crate::DISCOUNT_LINE_SEQUENCE;

use std::collections::BTreeMap;

// =============================================================================
// Specification
// =============================================================================

/// The three discount kinds, as a tagged variant.
///
/// Modeled as an enum rather than a flag-plus-branches so the per-line
/// short-circuit path is structurally explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Write the rate into every order line's own discount field.
    PerLinePercentage { rate: DiscountRate },

    /// One generated line per tax group, rate × group subtotal.
    GlobalPercentage { rate: DiscountRate },

    /// A fixed amount, split across tax groups proportionally.
    FixedAmount { amount: Money },
}

impl DiscountKind {
    /// Percentage-based kinds are subject to the ≤ 100% validation rule.
    pub const fn is_percentage_based(&self) -> bool {
        matches!(
            self,
            DiscountKind::PerLinePercentage { .. } | DiscountKind::GlobalPercentage { .. }
        )
    }
}

/// A discount request, as captured by the host's wizard/dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSpec {
    /// What to apply and how much.
    pub kind: DiscountKind,

    /// Taxes preselected for the discount in the host UI.
    ///
    /// Generated lines always carry their tax *group's* set (that is the
    /// whole point of the split); this field is carried through for hosts
    /// that surface it, e.g. as a default filter.
    pub tax_ids: TaxSet,
}

impl DiscountSpec {
    pub fn new(kind: DiscountKind) -> Self {
        DiscountSpec {
            kind,
            tax_ids: TaxSet::new(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// A generated adjustment line.
///
/// The amount is negative; the sequence is high so the line sorts after
/// ordinary lines. The store applier attaches the discount product when it
/// turns these into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLine {
    /// Negative monetary amount (the discount).
    pub amount: Money,

    /// Human-readable description, percent formatted at the caller's
    /// precision.
    pub description: String,

    /// The tax set of the group this line compensates.
    pub tax_ids: TaxSet,

    /// Sort order; always [`DISCOUNT_LINE_SEQUENCE`].
    pub sequence: u32,
}

/// What the computation decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountOutcome {
    /// Per-line kind: mutate every order line's discount field to this
    /// rate. No lines are generated on this path.
    SetLineDiscount { rate: DiscountRate },

    /// Zero, one, or many generated lines (empty = silent no-op).
    Lines(Vec<DiscountLine>),
}

impl DiscountOutcome {
    /// True when applying this outcome would touch nothing.
    pub fn is_noop(&self) -> bool {
        matches!(self, DiscountOutcome::Lines(lines) if lines.is_empty())
    }
}

// =============================================================================
// Context
// =============================================================================

/// Environment supplied by the caller.
///
/// The decimal precision for percent display is deliberately NOT embedded
/// here as a constant: it follows the host's discount decimal-precision
/// setting, whatever that is.
#[derive(Debug, Clone, Copy)]
pub struct DiscountContext<'a> {
    /// The order's total, used to back-compute the fixed-amount ratio.
    pub order_total: Money,

    /// Decimal places for percent text in descriptions.
    pub percent_decimals: u32,

    /// Tax display names for multi-group descriptions.
    pub taxes: &'a TaxRegistry,
}

// =============================================================================
// Effective Percentage
// =============================================================================

/// The percentage actually applied in the proportional split.
///
/// Derived directly from the spec for percentage kinds, or back-computed
/// as amount / order_total for the fixed kind. Kept as exact integers so
/// the split never goes through floating point.
#[derive(Debug, Clone, Copy)]
enum Effective {
    Rate(DiscountRate),
    Ratio { amount: Money, total: Money },
}

impl Effective {
    /// The discount taken from one group's subtotal.
    fn amount_of(&self, subtotal: Money) -> Money {
        match *self {
            Effective::Rate(rate) => subtotal.apply_rate(rate),
            Effective::Ratio { amount, total } => amount.proportional_share(subtotal, total),
        }
    }

    /// Percent text ("10.00") at the requested precision.
    fn percent_text(&self, decimals: u32) -> String {
        match *self {
            Effective::Rate(rate) => {
                format_percent(rate.bps() as i128, 10_000, decimals)
            }
            Effective::Ratio { amount, total } => {
                format_percent(amount.cents() as i128, total.cents() as i128, decimals)
            }
        }
    }
}

/// Renders `numer / denom` as a percentage with `decimals` places.
///
/// Integer math, half-up: `format_percent(825, 10_000, 2)` is `"8.25"`,
/// `format_percent(1, 3, 1)` is `"33.3"`. Zero precision renders without a
/// decimal point. `denom` must be positive.
fn format_percent(numer: i128, denom: i128, decimals: u32) -> String {
    let scale = 10_i128.pow(decimals);
    let scaled = (numer * 100 * scale + denom / 2) / denom;
    if decimals == 0 {
        scaled.to_string()
    } else {
        format!(
            "{}.{:0width$}",
            scaled / scale,
            scaled % scale,
            width = decimals as usize
        )
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes the adjustment(s) realizing `spec` against `lines`.
///
/// Pure: no record is created or mutated here. The returned outcome is a
/// set of instructions for the store applier.
///
/// ## Errors
/// [`ValidationError::InvalidDiscountAmount`] when a percentage-based kind
/// carries a rate above 100%. A fixed amount against a zero order total is
/// NOT an error: it is a silent no-op.
///
/// ## Example
/// ```rust
/// use tally_core::discount::{compute, DiscountContext, DiscountKind, DiscountOutcome, DiscountSpec};
/// use tally_core::money::Money;
/// use tally_core::types::{tax_set, DiscountRate, OrderLine, TaxRegistry};
///
/// let lines = vec![OrderLine {
///     id: "l1".into(),
///     quantity: 1,
///     unit_price: Money::from_cents(10000),
///     discount: DiscountRate::zero(),
///     tax_ids: tax_set(["t1"]),
/// }];
/// let registry = TaxRegistry::new();
/// let ctx = DiscountContext {
///     order_total: Money::from_cents(10000),
///     percent_decimals: 2,
///     taxes: &registry,
/// };
/// let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
///     rate: DiscountRate::from_bps(1000),
/// });
///
/// match compute(&lines, &spec, &ctx).unwrap() {
///     DiscountOutcome::Lines(lines) => assert_eq!(lines[0].amount.cents(), -1000),
///     _ => unreachable!(),
/// }
/// ```
pub fn compute(
    lines: &[OrderLine],
    spec: &DiscountSpec,
    ctx: &DiscountContext<'_>,
) -> ValidationResult<DiscountOutcome> {
    validate_spec(spec)?;

    let effective = match spec.kind {
        // Short-circuit: a distinct operation, not a degenerate split.
        DiscountKind::PerLinePercentage { rate } => {
            return Ok(DiscountOutcome::SetLineDiscount { rate });
        }
        DiscountKind::GlobalPercentage { rate } => Effective::Rate(rate),
        DiscountKind::FixedAmount { amount } => {
            if ctx.order_total.is_zero() {
                // Nothing to split against: silent no-op, not an error.
                return Ok(DiscountOutcome::Lines(Vec::new()));
            }
            Effective::Ratio {
                amount,
                total: ctx.order_total,
            }
        }
    };

    // Group by exact tax set (set equality, never overlap). BTreeMap keeps
    // group iteration deterministic regardless of input line order.
    let mut subtotal_per_tax_group: BTreeMap<TaxSet, Money> = BTreeMap::new();
    for line in lines {
        if !line.contributes() {
            continue;
        }
        *subtotal_per_tax_group
            .entry(line.tax_ids.clone())
            .or_insert_with(Money::zero) += line.discounted_subtotal();
    }

    if subtotal_per_tax_group.is_empty() {
        // No valid lines on which the discount can be applied
        return Ok(DiscountOutcome::Lines(Vec::new()));
    }

    let percent = effective.percent_text(ctx.percent_decimals);

    let discount_lines = if subtotal_per_tax_group.len() == 1 {
        // No taxes, or all lines carry the exact same taxes
        let (taxes, subtotal) = subtotal_per_tax_group.into_iter().next().unwrap_or_default();
        vec![DiscountLine {
            amount: -effective.amount_of(subtotal),
            description: format!("Discount {percent}%"),
            tax_ids: taxes,
            sequence: DISCOUNT_LINE_SEQUENCE,
        }]
    } else {
        subtotal_per_tax_group
            .into_iter()
            .map(|(taxes, subtotal)| {
                let names = ctx.taxes.joined_names(&taxes);
                let description = match spec.kind {
                    // The fixed-amount ratio is internal; naming it as a
                    // rate would mislead, so only the taxes are listed.
                    DiscountKind::FixedAmount { .. } => {
                        format!("Discount - On products with the following taxes {names}")
                    }
                    _ => format!(
                        "Discount {percent}% - On products with the following taxes {names}"
                    ),
                };
                DiscountLine {
                    amount: -effective.amount_of(subtotal),
                    description,
                    tax_ids: taxes,
                    sequence: DISCOUNT_LINE_SEQUENCE,
                }
            })
            .collect()
    };

    Ok(DiscountOutcome::Lines(discount_lines))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{tax_set, Tax};

    fn line(id: &str, qty: i64, price_cents: i64, taxes: &[&str]) -> OrderLine {
        OrderLine {
            id: id.to_string(),
            quantity: qty,
            unit_price: Money::from_cents(price_cents),
            discount: DiscountRate::zero(),
            tax_ids: tax_set(taxes.iter().copied()),
        }
    }

    fn registry() -> TaxRegistry {
        let mut r = TaxRegistry::new();
        r.register(Tax::new("t1", "VAT 5%"));
        r.register(Tax::new("t2", "VAT 21%"));
        r
    }

    fn ctx(registry: &TaxRegistry, total_cents: i64) -> DiscountContext<'_> {
        DiscountContext {
            order_total: Money::from_cents(total_cents),
            percent_decimals: 2,
            taxes: registry,
        }
    }

    fn expect_lines(outcome: DiscountOutcome) -> Vec<DiscountLine> {
        match outcome {
            DiscountOutcome::Lines(lines) => lines,
            other => panic!("expected generated lines, got {other:?}"),
        }
    }

    #[test]
    fn test_global_percentage_single_group() {
        // Two lines, both {t1}, $100 + $50, qty 1, 10% global
        let lines = vec![
            line("l1", 1, 10000, &["t1"]),
            line("l2", 1, 5000, &["t1"]),
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(1000),
        });

        let out = expect_lines(compute(&lines, &spec, &ctx(&r, 15000)).unwrap());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount.cents(), -1500); // -$15.00
        assert_eq!(out[0].tax_ids, tax_set(["t1"]));
        assert_eq!(out[0].description, "Discount 10.00%");
        assert_eq!(out[0].sequence, DISCOUNT_LINE_SEQUENCE);
    }

    #[test]
    fn test_global_percentage_two_groups() {
        // {t1} subtotal $100, {t2} subtotal $200, 20% global
        let lines = vec![
            line("l1", 1, 10000, &["t1"]),
            line("l2", 1, 20000, &["t2"]),
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(2000),
        });

        let out = expect_lines(compute(&lines, &spec, &ctx(&r, 30000)).unwrap());
        assert_eq!(out.len(), 2);

        // BTreeMap order: {t1} before {t2}
        assert_eq!(out[0].amount.cents(), -2000);
        assert_eq!(out[0].tax_ids, tax_set(["t1"]));
        assert_eq!(
            out[0].description,
            "Discount 20.00% - On products with the following taxes VAT 5%"
        );
        assert_eq!(out[1].amount.cents(), -4000);
        assert_eq!(out[1].tax_ids, tax_set(["t2"]));
        assert_eq!(
            out[1].description,
            "Discount 20.00% - On products with the following taxes VAT 21%"
        );
    }

    #[test]
    fn test_discount_sum_matches_rate_times_grouped_subtotals() {
        let lines = vec![
            line("l1", 2, 3300, &["t1"]),
            line("l2", 1, 12100, &["t2"]),
            line("l3", 5, 990, &[]),
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(1000), // 10%
        });

        let grouped: i64 = lines.iter().map(|l| l.discounted_subtotal().cents()).sum();
        let out = expect_lines(compute(&lines, &spec, &ctx(&r, grouped)).unwrap());
        let total: i64 = out.iter().map(|l| l.amount.cents()).sum();

        // 10% of each group, summed; each group rounds independently
        let expected: i64 = [6600_i64, 12100, 4950]
            .iter()
            .map(|s| (s * 1000 + 5000) / 10000)
            .sum();
        assert_eq!(total, -expected);
    }

    #[test]
    fn test_per_line_percentage_short_circuits() {
        let lines = vec![line("l1", 1, 10000, &["t1"])];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::PerLinePercentage {
            rate: DiscountRate::from_bps(1500),
        });

        let out = compute(&lines, &spec, &ctx(&r, 10000)).unwrap();
        assert_eq!(
            out,
            DiscountOutcome::SetLineDiscount {
                rate: DiscountRate::from_bps(1500)
            }
        );
        assert!(!out.is_noop());
    }

    #[test]
    fn test_percentage_over_full_fails() {
        // 150% fails for both percentage-based kinds
        let lines = vec![line("l1", 1, 10000, &["t1"])];
        let r = registry();
        let c = ctx(&r, 10000);

        for kind in [
            DiscountKind::PerLinePercentage {
                rate: DiscountRate::from_bps(15_000),
            },
            DiscountKind::GlobalPercentage {
                rate: DiscountRate::from_bps(15_000),
            },
        ] {
            let err = compute(&lines, &DiscountSpec::new(kind), &c).unwrap_err();
            assert_eq!(err, ValidationError::InvalidDiscountAmount { bps: 15_000 });
        }
    }

    #[test]
    fn test_fixed_amount_over_full_is_allowed() {
        // The >100% rule binds percentages, not amounts
        let lines = vec![line("l1", 1, 10000, &["t1"])];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::FixedAmount {
            amount: Money::from_cents(99_999),
        });
        assert!(compute(&lines, &spec, &ctx(&r, 10000)).is_ok());
    }

    #[test]
    fn test_fixed_amount_zero_total_is_silent_noop() {
        let lines = vec![line("l1", 1, 10000, &["t1"])];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::FixedAmount {
            amount: Money::from_cents(2000),
        });

        let out = compute(&lines, &spec, &ctx(&r, 0)).unwrap();
        assert!(out.is_noop());
    }

    #[test]
    fn test_fixed_amount_single_group_names_back_computed_percent() {
        // $25 fixed against a $100 order: ratio 25%, shown in the text
        let lines = vec![line("l1", 1, 10000, &["t1"])];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::FixedAmount {
            amount: Money::from_cents(2500),
        });

        let out = expect_lines(compute(&lines, &spec, &ctx(&r, 10000)).unwrap());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount.cents(), -2500);
        assert_eq!(out[0].description, "Discount 25.00%");
    }

    #[test]
    fn test_fixed_amount_splits_proportionally_and_omits_percent() {
        // {t1} $50, {t2} $150, $20 fixed on a $200 total → $5 and $15
        let lines = vec![
            line("l1", 1, 5000, &["t1"]),
            line("l2", 1, 15000, &["t2"]),
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::FixedAmount {
            amount: Money::from_cents(2000),
        });

        let out = expect_lines(compute(&lines, &spec, &ctx(&r, 20000)).unwrap());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].amount.cents(), -500);
        assert_eq!(out[1].amount.cents(), -1500);
        assert_eq!(
            out[0].description,
            "Discount - On products with the following taxes VAT 5%"
        );
        assert_eq!(
            out[1].description,
            "Discount - On products with the following taxes VAT 21%"
        );
    }

    #[test]
    fn test_grouping_is_exact_set_based() {
        // {t1,t2} and {t1} must never merge
        let lines = vec![
            line("l1", 1, 10000, &["t1", "t2"]),
            line("l2", 1, 10000, &["t1"]),
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(1000),
        });

        let out = expect_lines(compute(&lines, &spec, &ctx(&r, 20000)).unwrap());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_reordering_lines_does_not_change_groups() {
        let forward = vec![
            line("l1", 1, 10000, &["t1"]),
            line("l2", 2, 5000, &["t2"]),
            line("l3", 1, 2500, &["t1"]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(500),
        });
        let c = ctx(&r, 22500);

        let a = expect_lines(compute(&forward, &spec, &c).unwrap());
        let b = expect_lines(compute(&reversed, &spec, &c).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_qty_and_zero_price_lines_are_skipped() {
        let lines = vec![
            line("l1", 0, 10000, &["t1"]), // zero qty
            line("l2", 3, 0, &["t1"]),     // zero price
        ];
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(1000),
        });

        let out = compute(&lines, &spec, &ctx(&r, 30000)).unwrap();
        assert!(out.is_noop());
    }

    #[test]
    fn test_line_discount_reduces_grouped_subtotal() {
        // $100 line already 50% off contributes $50; 10% global = -$5
        let mut l = line("l1", 1, 10000, &["t1"]);
        l.discount = DiscountRate::from_bps(5000);
        let r = registry();
        let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
            rate: DiscountRate::from_bps(1000),
        });

        let out = expect_lines(compute(&[l], &spec, &ctx(&r, 5000)).unwrap());
        assert_eq!(out[0].amount.cents(), -500);
    }

    #[test]
    fn test_spec_json_shape_for_hosts() {
        // The host wizard exchanges specs as internally tagged JSON
        let spec = DiscountSpec::new(DiscountKind::FixedAmount {
            amount: Money::from_cents(2500),
        });
        let json = serde_json::to_string(&spec.kind).unwrap();
        assert_eq!(json, r#"{"kind":"fixed_amount","amount":2500}"#);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1000, 10_000, 2), "10.00");
        assert_eq!(format_percent(825, 10_000, 2), "8.25");
        assert_eq!(format_percent(825, 10_000, 1), "8.3"); // half-up
        assert_eq!(format_percent(825, 10_000, 0), "8");
        assert_eq!(format_percent(1, 3, 2), "33.33");
        assert_eq!(format_percent(2, 3, 0), "67");
        assert_eq!(format_percent(2500, 10000, 3), "25.000");
    }
}
