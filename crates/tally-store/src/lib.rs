//! # tally-store: Record-Store Collaborator for Tally POS
//!
//! This crate stands in for the host application's record system: a store
//! keyed by identifier with record creation, field writes, attribute
//! reads, and the lazily resolved per-company discount product, gated by
//! a permission predicate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Tally Discount Engine Data Flow                     │
//! │                                                                         │
//! │  Host wizard (apply a discount to order X)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ InMemoryStore │    │ AccessPolicy  │    │   Applier    │  │   │
//! │  │   │  (store.rs)   │    │  (access.rs)  │    │ (applier.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ records +     │◄───│ can_create /  │◄───│ compute() →  │  │   │
//! │  │   │ product slot  │    │ can_write     │    │ effects      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tally-core::compute (pure, no effects)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`records`] - Record shapes (company, product, order, order line)
//! - [`store`] - The in-memory store and discount-product resolution
//! - [`access`] - The permission predicate trait and stock policies
//! - [`applier`] - Turns computed outcomes into record effects
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::{tax_set, DiscountKind, DiscountRate, DiscountSpec, Money, Tax};
//! use tally_store::{apply_discount, AllowAll, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.register_tax(Tax::new("vat-std", "VAT 21%"));
//! let company = store.create_company("Tally Cafe");
//! let order = store.create_order(&company.id).unwrap();
//! store
//!     .add_line(
//!         &order.id,
//!         2,
//!         Money::from_cents(4_950),
//!         DiscountRate::zero(),
//!         tax_set(["vat-std"]),
//!     )
//!     .unwrap();
//!
//! let spec = DiscountSpec::new(DiscountKind::GlobalPercentage {
//!     rate: DiscountRate::from_bps(1_000), // 10%
//! });
//! let applied = apply_discount(&store, &AllowAll, &order.id, &spec, 2).unwrap();
//! println!("{applied:?}");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod applier;
pub mod error;
pub mod records;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{AccessPolicy, AllowAll, DenyAll};
pub use applier::{apply_discount, AppliedDiscount};
pub use error::{StoreError, StoreResult};
pub use records::{
    CompanyRecord, InvoicePolicy, OrderLineRecord, OrderRecord, ProductKind, ProductRecord,
};
pub use store::{InMemoryStore, DISCOUNT_PRODUCT_FIELD};
