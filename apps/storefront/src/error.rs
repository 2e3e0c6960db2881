//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Eshopee                                │
//! │                                                                         │
//! │  UI                          Rust Backend                               │
//! │  ──                          ────────────                               │
//! │                                                                         │
//! │  commands::get_product(..)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown product? ─── CoreError::ProductNotFound ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Bad form input? ──── ValidationError ─────────── ApiError ────►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Login rejected? ──── AuthError ───────────────────┘            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code = "NOT_FOUND", e.message = "Product not found: 42"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use eshopee_core::{CoreError, ValidationError};
use eshopee_db::DbError;
use serde::Serialize;

use crate::auth::AuthError;
use crate::state::ConfigError;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Local storage failed
    DatabaseError,

    /// Login or registration rejected
    InvalidCredentials,

    /// Cart operation not possible (e.g. checkout of an empty cart)
    CartError,

    /// Operation not allowed in the current state
    BusinessLogic,

    /// Configuration could not be loaded
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Local storage connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage unavailable")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Local storage migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Local storage query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage operation failed")
            }
            DbError::Serialization { namespace, message } => {
                tracing::error!(namespace = %namespace, "Malformed record: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is malformed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Local storage is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::EmptyCart => ApiError::cart("Your cart is empty"),
            e @ CoreError::InvalidCheckoutStep { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            CoreError::InvalidCatalog(e) => {
                tracing::error!("Invalid catalog: {}", e);
                ApiError::internal("Product catalog is unavailable")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, err.to_string())
            }
            AuthError::Validation(e) => e.into(),
            AuthError::Unavailable(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::ProductNotFound("42".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 42");

        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);

        let err: ApiError = CoreError::Validation(ValidationError::required("email")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_auth_error_codes() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let err: ApiError = AuthError::Validation(ValidationError::required("password")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", "7");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 7");
    }
}
