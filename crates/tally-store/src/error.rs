//! # Store Error Types
//!
//! Error types for record-store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (tally-core)                                          │
//! │       │  #[from]                                                        │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds configuration / lookup failures       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Host application surfaces the message and lets the user correct       │
//! │                                                                         │
//! │  Both taxonomies are terminal: no retry, no silent default product.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tally_core::ValidationError;

/// Record-store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No discount product is configured and the caller may not create one.
    ///
    /// ## When This Occurs
    /// - The company has no discount product recorded, AND
    /// - the access policy denies product creation, company writes, or
    ///   writes to the company's discount-product field
    ///
    /// There is no fallback product; an administrator has to grant the
    /// discount once (creating the product) or configure one.
    #[error(
        "There does not seem to be any discount product configured for this company yet. \
         You can either use a per-line discount, or ask an administrator to grant the \
         discount the first time."
    )]
    MissingConfiguration,

    /// Entity not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input validation failed before any record was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Shorthand for a [`StoreError::NotFound`].
    pub fn not_found(entity: &str, id: &str) -> Self {
        StoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("order", "o-42");
        assert_eq!(err.to_string(), "order not found: o-42");
    }

    #[test]
    fn test_validation_converts_to_store_error() {
        let validation = ValidationError::InvalidDiscountAmount { bps: 20_000 };
        let err: StoreError = validation.into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: Invalid discount amount");
    }
}
