//! # Access Policy
//!
//! The permission predicate gating lazy discount-product creation.
//!
//! The host's real access-control system answers these questions in
//! production; the engine only ever asks them right before it would
//! create the discount product and write it onto the company record.
//! Denial is not an error by itself - it becomes
//! [`crate::StoreError::MissingConfiguration`] only when no product is
//! configured either.

/// Permission checks consulted by discount-product resolution.
///
/// All three must pass for the store to create the product on first use:
/// creating a product record, writing the company record, and writing the
/// specific discount-product field on it.
pub trait AccessPolicy {
    /// May the current caller create product records?
    fn can_create_products(&self) -> bool;

    /// May the current caller write this company record?
    fn can_write_company(&self, company_id: &str) -> bool;

    /// May the current caller write this field of the company record?
    fn can_write_company_field(&self, company_id: &str, field: &str) -> bool;
}

/// Policy granting everything. What an administrator session looks like.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn can_create_products(&self) -> bool {
        true
    }

    fn can_write_company(&self, _company_id: &str) -> bool {
        true
    }

    fn can_write_company_field(&self, _company_id: &str, _field: &str) -> bool {
        true
    }
}

/// Policy denying all writes. What a restricted cashier session looks
/// like: discounts still work if a product is already configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn can_create_products(&self) -> bool {
        false
    }

    fn can_write_company(&self, _company_id: &str) -> bool {
        false
    }

    fn can_write_company_field(&self, _company_id: &str, _field: &str) -> bool {
        false
    }
}
