//! # Error Types
//!
//! Domain-specific error types for eshopee-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  eshopee-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  eshopee-db errors (separate crate)                                    │
//! │  └── DbError          - Local storage failures                         │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  ├── AuthError        - Authenticator failures                         │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI notification        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations on unknown product ids are NOT errors: they are silent
//! no-ops. Only lookups that the UI must render differently (a product page
//! for an unknown id) produce [`CoreError::ProductNotFound`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core storefront errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    ///
    /// ## When This Occurs
    /// - Direct navigation to a product page with an unknown id
    /// - `add_to_cart` for an id that is not in the catalog
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout was started or an order placed with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout action is not valid for the current step.
    ///
    /// ## When This Occurs
    /// - Placing an order before reaching the payment step
    #[error("Cannot {action} during the {step} step")]
    InvalidCheckoutStep { action: String, step: String },

    /// The embedded catalog seed could not be parsed.
    #[error("Catalog data is invalid: {0}")]
    InvalidCatalog(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
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

// =============================================================================
// Unit Tests
// =============================================================================
