//! # Error Types
//!
//! Domain-specific error types for orina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orina-core errors (this file)                                         │
//! │  ├── CoreError        - Lookups that a collaborator asked for          │
//! │  └── ValidationError  - Boundary guards (cart, formulation, settings)  │
//! │                                                                         │
//! │  orina-store errors (separate crate)                                   │
//! │  └── StoreError       - Document read/write/import failures            │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! The state transitions themselves never fail. Dangling product references,
//! negative stock and unknown ids are tolerated and resolve to zero or no-op.
//! Errors only exist at the boundary, before a command reaches the reducer.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - A collaborator asks to add an unknown product id to the cart
    /// - A recipe sheet is requested for a deleted product
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Boundary validation errors.
///
/// These block a call before it reaches the reducer. The reducer itself
/// assumes they hold.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Sale submitted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Formulation saved without any ingredient lines.
    #[error("Formulation for {product_id} has no ingredients")]
    NoIngredients { product_id: String },

    /// The same raw material appears twice in one formulation.
    #[error("Ingredient {item_id} is listed more than once")]
    DuplicateIngredient { item_id: String },

    /// Only finished goods can be sold or own a formulation.
    #[error("{product_id} is not a finished good")]
    NotFinishedGood { product_id: String },

    /// A finished good listed as a formulation ingredient.
    #[error("{item_id} is a finished good and cannot be an ingredient")]
    FinishedGoodIngredient { item_id: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Uploaded logo exceeds the size limit.
    #[error("Logo is {size} bytes, limit is {max} bytes")]
    LogoTooLarge { size: usize, max: usize },
}

impl ValidationError {
    /// Creates a Required error for a field name.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("fg-9".to_string());
        assert_eq!(err.to_string(), "Product not found: fg-9");

        let err = ValidationError::NoIngredients {
            product_id: "fg-1".to_string(),
        };
        assert_eq!(err.to_string(), "Formulation for fg-1 has no ingredients");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::EmptyCart.to_string(), "Cart is empty");
        assert_eq!(
            ValidationError::required("productId").to_string(),
            "productId is required"
        );
        assert_eq!(
            ValidationError::NotFinishedGood {
                product_id: "rm-1".to_string()
            }
            .to_string(),
            "rm-1 is not a finished good"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
