//! # In-Memory Record Store
//!
//! The stand-in for the host application's record system.
//!
//! ## Thread Safety
//! The store wraps its state in a `Mutex` because:
//! 1. The discount product slot is process-wide shared configuration
//! 2. Racing resolutions for the same company must settle first-write-wins
//! 3. Each method is one atomic step inside the caller's transaction
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Discount Product Resolution (per company)                  │
//! │                                                                         │
//! │  resolve_or_create_discount_product(company, policy)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  slot configured? ──yes──► return the recorded product                 │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  policy grants create + company write + field write?                   │
//! │       │ yes                          │ no                               │
//! │       ▼                              ▼                                  │
//! │  create "Discount" service     MissingConfiguration                    │
//! │  record it on the company      (terminal, no fallback)                 │
//! │                                                                         │
//! │  All under one lock: two racing callers cannot both create.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use tally_core::validation::validate_order_line;
use tally_core::{DiscountLine, DiscountRate, Money, Tax, TaxRegistry, TaxSet};

use crate::access::AccessPolicy;
use crate::error::{StoreError, StoreResult};
use crate::records::{
    CompanyRecord, InvoicePolicy, OrderLineRecord, OrderRecord, ProductKind, ProductRecord,
};

/// Sequence step for ordinary lines (10, 20, 30, …).
const LINE_SEQUENCE_STEP: u32 = 10;

/// The company field holding the discount product id, as named in
/// access-policy checks.
pub const DISCOUNT_PRODUCT_FIELD: &str = "discount_product_id";

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Default)]
struct Inner {
    companies: HashMap<String, CompanyRecord>,
    products: HashMap<String, ProductRecord>,
    orders: HashMap<String, OrderRecord>,
    lines_by_order: HashMap<String, Vec<OrderLineRecord>>,
    taxes: TaxRegistry,
    /// Category assigned to lazily created discount products, when known.
    services_category: Option<String>,
}

/// In-memory record store keyed by identifier.
///
/// Offers exactly what the discount applier consumes: record creation,
/// field writes, attribute reads, and the per-company discount-product
/// slot gated by an [`AccessPolicy`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    // -------------------------------------------------------------------------
    // Setup: companies, taxes, category
    // -------------------------------------------------------------------------

    /// Creates a company record.
    pub fn create_company(&self, name: impl Into<String>) -> CompanyRecord {
        let company = CompanyRecord {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            discount_product_id: None,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        inner.companies.insert(company.id.clone(), company.clone());
        company
    }

    /// Registers a tax so descriptions can name it.
    pub fn register_tax(&self, tax: Tax) {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        inner.taxes.register(tax);
    }

    /// Declares the services category for lazily created discount products.
    ///
    /// Optional: without it the product is created category-less, same as
    /// when the host has no services category.
    pub fn set_services_category(&self, category_id: impl Into<String>) {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        inner.services_category = Some(category_id.into());
    }

    /// Snapshot of the tax registry for description rendering.
    pub fn tax_registry(&self) -> TaxRegistry {
        let inner = self.inner.lock().expect("Store mutex poisoned");
        inner.taxes.clone()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Reads a company record.
    pub fn company(&self, id: &str) -> StoreResult<CompanyRecord> {
        let inner = self.inner.lock().expect("Store mutex poisoned");
        inner
            .companies
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("company", id))
    }

    /// Reads a product record.
    pub fn product(&self, id: &str) -> StoreResult<ProductRecord> {
        let inner = self.inner.lock().expect("Store mutex poisoned");
        inner
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    /// Reads an order record.
    pub fn order(&self, id: &str) -> StoreResult<OrderRecord> {
        let inner = self.inner.lock().expect("Store mutex poisoned");
        inner
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    /// Reads an order's lines, in sequence order.
    pub fn order_lines(&self, order_id: &str) -> StoreResult<Vec<OrderLineRecord>> {
        let inner = self.inner.lock().expect("Store mutex poisoned");
        if !inner.orders.contains_key(order_id) {
            return Err(StoreError::not_found("order", order_id));
        }
        let mut lines = inner
            .lines_by_order
            .get(order_id)
            .cloned()
            .unwrap_or_default();
        lines.sort_by_key(|l| l.sequence);
        Ok(lines)
    }

    // -------------------------------------------------------------------------
    // Order building
    // -------------------------------------------------------------------------

    /// Creates an empty order for a company.
    pub fn create_order(&self, company_id: &str) -> StoreResult<OrderRecord> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        if !inner.companies.contains_key(company_id) {
            return Err(StoreError::not_found("company", company_id));
        }
        let order = OrderRecord {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            created_at: Utc::now(),
        };
        inner.orders.insert(order.id.clone(), order.clone());
        inner.lines_by_order.insert(order.id.clone(), Vec::new());
        Ok(order)
    }

    /// Appends an ordinary line to an order.
    ///
    /// Validates quantity and line discount before touching the order, so
    /// a rejected line leaves the store unchanged.
    pub fn add_line(
        &self,
        order_id: &str,
        quantity: i64,
        unit_price: Money,
        discount: DiscountRate,
        tax_ids: TaxSet,
    ) -> StoreResult<OrderLineRecord> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        let lines = inner
            .lines_by_order
            .get_mut(order_id)
            .ok_or_else(|| StoreError::not_found("order", order_id))?;

        let record = OrderLineRecord {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: None,
            description: None,
            quantity,
            unit_price,
            discount,
            tax_ids,
            sequence: (lines.len() as u32 + 1) * LINE_SEQUENCE_STEP,
            created_at: Utc::now(),
        };
        validate_order_line(&record.to_order_line())?;

        lines.push(record.clone());
        Ok(record)
    }

    // -------------------------------------------------------------------------
    // Discount product resolution
    // -------------------------------------------------------------------------

    /// Preconfigures the discount product for a company.
    pub fn set_discount_product(&self, company_id: &str, product_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        if !inner.products.contains_key(product_id) {
            return Err(StoreError::not_found("product", product_id));
        }
        let company = inner
            .companies
            .get_mut(company_id)
            .ok_or_else(|| StoreError::not_found("company", company_id))?;
        company.discount_product_id = Some(product_id.to_string());
        Ok(())
    }

    /// Inserts a product record (host-side catalog management).
    pub fn create_product(&self, product: ProductRecord) -> ProductRecord {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        inner.products.insert(product.id.clone(), product.clone());
        product
    }

    /// Returns the company's discount product, creating it on first use.
    ///
    /// Creation requires the policy to grant product creation, company
    /// write, and write access to the company's discount-product field.
    /// Without a configured product and without those grants the operation
    /// fails with [`StoreError::MissingConfiguration`] - there is no
    /// silent fallback.
    ///
    /// Runs under one lock acquisition, so two racing callers settle
    /// first-write-wins: the second sees the slot already filled.
    pub fn resolve_or_create_discount_product(
        &self,
        company_id: &str,
        policy: &dyn AccessPolicy,
    ) -> StoreResult<ProductRecord> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");

        let company = inner
            .companies
            .get(company_id)
            .ok_or_else(|| StoreError::not_found("company", company_id))?;

        if let Some(product_id) = company.discount_product_id.clone() {
            return inner
                .products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found("product", &product_id));
        }

        let may_create = policy.can_create_products()
            && policy.can_write_company(company_id)
            && policy.can_write_company_field(company_id, DISCOUNT_PRODUCT_FIELD);
        if !may_create {
            return Err(StoreError::MissingConfiguration);
        }

        let product = ProductRecord {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: "Discount".to_string(),
            kind: ProductKind::Service,
            invoice_policy: InvoicePolicy::Order,
            list_price: Money::zero(),
            tax_ids: TaxSet::new(),
            category: inner.services_category.clone(),
            created_at: Utc::now(),
        };

        info!(
            company_id = %company_id,
            product_id = %product.id,
            "created discount product on first use"
        );

        inner.products.insert(product.id.clone(), product.clone());
        if let Some(company) = inner.companies.get_mut(company_id) {
            company.discount_product_id = Some(product.id.clone());
        }
        Ok(product)
    }

    // -------------------------------------------------------------------------
    // Discount application writes
    // -------------------------------------------------------------------------

    /// Writes a discount rate into every line of an order (the per-line
    /// branch). Returns the number of lines written.
    pub fn write_line_discount(&self, order_id: &str, rate: DiscountRate) -> StoreResult<usize> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        let lines = inner
            .lines_by_order
            .get_mut(order_id)
            .ok_or_else(|| StoreError::not_found("order", order_id))?;

        for line in lines.iter_mut() {
            line.discount = rate;
        }
        debug!(order_id = %order_id, count = lines.len(), bps = rate.bps(), "wrote per-line discount");
        Ok(lines.len())
    }

    /// Creates one order line record per generated discount line.
    pub fn append_discount_lines(
        &self,
        order_id: &str,
        product: &ProductRecord,
        discount_lines: &[DiscountLine],
    ) -> StoreResult<Vec<OrderLineRecord>> {
        let mut inner = self.inner.lock().expect("Store mutex poisoned");
        let lines = inner
            .lines_by_order
            .get_mut(order_id)
            .ok_or_else(|| StoreError::not_found("order", order_id))?;

        let mut created = Vec::with_capacity(discount_lines.len());
        for discount_line in discount_lines {
            let record = OrderLineRecord {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                product_id: Some(product.id.clone()),
                description: Some(discount_line.description.clone()),
                quantity: 1,
                unit_price: discount_line.amount,
                discount: DiscountRate::zero(),
                tax_ids: discount_line.tax_ids.clone(),
                sequence: discount_line.sequence,
                created_at: Utc::now(),
            };
            debug!(
                order_id = %order_id,
                line_id = %record.id,
                amount = %discount_line.amount,
                "created discount line"
            );
            lines.push(record.clone());
            created.push(record);
        }
        Ok(created)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AllowAll, DenyAll};

    #[test]
    fn test_lazy_product_created_once() {
        let store = InMemoryStore::new();
        store.set_services_category("cat-services");
        let company = store.create_company("Tally Cafe");

        let first = store
            .resolve_or_create_discount_product(&company.id, &AllowAll)
            .unwrap();
        assert_eq!(first.name, "Discount");
        assert_eq!(first.kind, ProductKind::Service);
        assert_eq!(first.invoice_policy, InvoicePolicy::Order);
        assert!(first.list_price.is_zero());
        assert!(first.tax_ids.is_empty());
        assert_eq!(first.category.as_deref(), Some("cat-services"));

        // Second resolution returns the same record, no new product
        let second = store
            .resolve_or_create_discount_product(&company.id, &AllowAll)
            .unwrap();
        assert_eq!(first.id, second.id);

        // The slot is recorded on the company
        let company = store.company(&company.id).unwrap();
        assert_eq!(company.discount_product_id, Some(first.id));
    }

    #[test]
    fn test_resolution_without_permission_fails() {
        let store = InMemoryStore::new();
        let company = store.create_company("Tally Cafe");

        let err = store
            .resolve_or_create_discount_product(&company.id, &DenyAll)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingConfiguration));

        // And nothing was recorded
        let company = store.company(&company.id).unwrap();
        assert_eq!(company.discount_product_id, None);
    }

    #[test]
    fn test_preconfigured_product_wins_over_creation() {
        let store = InMemoryStore::new();
        let company = store.create_company("Tally Cafe");

        let configured = store.create_product(ProductRecord {
            id: "prod-configured".to_string(),
            company_id: company.id.clone(),
            name: "House Discount".to_string(),
            kind: ProductKind::Service,
            invoice_policy: InvoicePolicy::Order,
            list_price: Money::zero(),
            tax_ids: TaxSet::new(),
            category: None,
            created_at: Utc::now(),
        });
        store
            .set_discount_product(&company.id, &configured.id)
            .unwrap();

        // Even a restricted session resolves the configured product
        let resolved = store
            .resolve_or_create_discount_product(&company.id, &DenyAll)
            .unwrap();
        assert_eq!(resolved.id, "prod-configured");
    }

    #[test]
    fn test_add_line_validates_before_insert() {
        let store = InMemoryStore::new();
        let company = store.create_company("Tally Cafe");
        let order = store.create_order(&company.id).unwrap();

        let err = store
            .add_line(
                &order.id,
                -2,
                Money::from_cents(500),
                DiscountRate::zero(),
                TaxSet::new(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.order_lines(&order.id).unwrap().is_empty());
    }

    #[test]
    fn test_lines_sorted_by_sequence() {
        let store = InMemoryStore::new();
        let company = store.create_company("Tally Cafe");
        let order = store.create_order(&company.id).unwrap();

        store
            .add_line(
                &order.id,
                1,
                Money::from_cents(500),
                DiscountRate::zero(),
                TaxSet::new(),
            )
            .unwrap();
        store
            .add_line(
                &order.id,
                1,
                Money::from_cents(700),
                DiscountRate::zero(),
                TaxSet::new(),
            )
            .unwrap();

        let lines = store.order_lines(&order.id).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].sequence < lines[1].sequence);
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.order_lines("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
