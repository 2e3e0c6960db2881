//! # Validation Module
//!
//! Input validation for the login, register and checkout forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                      │
//! │  ├── Required-field markers                                            │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands (Rust)                                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: form rules, checked before any state change          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Authenticator                                                 │
//! │  └── Credential check (InvalidCredentials)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eshopee_core::validation::{validate_email, validate_login};
//!
//! assert!(validate_email("a@b.com").is_ok());
//! assert!(validate_login("a@b.com", "").is_err());
//! ```

use crate::checkout::ShippingDetails;
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest accepted email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must contain `@`
/// - At most 254 characters
///
/// ## Example
/// ```rust
/// use eshopee_core::validation::validate_email;
///
/// assert!(validate_email("shopper@example.com").is_ok());
/// assert!(validate_email("").is_err());
/// assert!(validate_email("no-at-sign").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Must not be empty
///
/// Strength rules belong to a real identity provider; the mock accepts any
/// non-empty password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates the login form.
pub fn validate_login(email: &str, password: &str) -> ValidationResult<()> {
    validate_email(email)?;
    validate_password(password)
}

/// Validates the register form.
pub fn validate_registration(name: &str, email: &str, password: &str) -> ValidationResult<()> {
    validate_name(name)?;
    validate_login(email, password)
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the shipping form (checkout step 1).
///
/// ## Rules
/// - First name, last name, address, city, state, zip: required
/// - Email: required and must contain `@`
/// - Phone and country: optional
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: "Continue to Delivery"                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_shipping_details(&form) ← THIS FUNCTION                      │
/// │       │                                                                 │
/// │       ├── first empty field → Error: "<field> is required"             │
/// │       │                                                                 │
/// │       └── OK → step 2 (Delivery)                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_shipping_details(details: &ShippingDetails) -> ValidationResult<()> {
    let required = [
        ("firstName", &details.first_name),
        ("lastName", &details.last_name),
        ("email", &details.email),
        ("address", &details.address),
        ("city", &details.city),
        ("state", &details.state),
        ("zip", &details.zip),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::required(field));
        }
    }

    validate_email(&details.email)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity requested from the product page.
///
/// ## Rules
/// - Must be at least 1
///
/// Cart quantity updates do not go through here: a non-positive update
/// removes the line instead.
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    u32::try_from(qty)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: u32::MAX as i64,
        })
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  spaced@example.com  ").is_ok());

        assert_eq!(validate_email("   "), Err(ValidationError::required("email")));
        assert!(matches!(
            validate_email("plainaddress"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_email(&format!("{}@x.io", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("a@b.com", "x").is_ok());
        assert_eq!(
            validate_login("a@b.com", ""),
            Err(ValidationError::required("password"))
        );
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("Jane", "jane@example.com", "secret").is_ok());
        assert_eq!(
            validate_registration(" ", "jane@example.com", "secret"),
            Err(ValidationError::required("name"))
        );
        assert!(validate_registration(&"n".repeat(101), "j@e.com", "s").is_err());
    }

    #[test]
    fn test_validate_shipping_details() {
        let mut details = ShippingDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            address: "12 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip: "10001".into(),
            ..ShippingDetails::default()
        };
        assert!(validate_shipping_details(&details).is_ok());

        details.city.clear();
        assert_eq!(
            validate_shipping_details(&details),
            Err(ValidationError::required("city"))
        );

        details.city = "London".into();
        details.email = "ada.example.com".into();
        assert!(validate_shipping_details(&details).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1), Ok(1));
        assert_eq!(validate_quantity(25), Ok(25));
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
