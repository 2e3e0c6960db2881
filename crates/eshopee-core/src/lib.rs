//! # eshopee-core: Pure Storefront Logic
//!
//! This crate is the **heart** of the Eshopee storefront. It contains the cart,
//! catalog, filtering, checkout and auth domain logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Eshopee Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (out of scope)                       │   │
//! │  │   Product grid ──► Cart sidebar ──► Checkout ──► Login           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/storefront (composition root)               │   │
//! │  │      CartStore, AuthStore, persistence observer, config          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ eshopee-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │ catalog │ │  cart   │ │ filter  │ │ checkout │ │  auth  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Category, Badge, TaxRate
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - The static product catalog and lookups
//! - [`cart`] - Cart state and derived totals
//! - [`filter`] - Product listing filter/sort view logic
//! - [`checkout`] - Order summary, delivery options, checkout steps
//! - [`auth`] - User and session state
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use eshopee_core::{Cart, Catalog};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let product = catalog.products()[0].clone();
//!
//! let cart = Cart::new().add_item(&product).add_item(&product);
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price(), product.price * 2);
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod filter;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AuthPhase, AuthSnapshot, AuthState, User};
pub use cart::{Cart, CartItem, CartSnapshot, CartSnapshotEntry};
pub use catalog::Catalog;
pub use checkout::{
    CheckoutPolicy, CheckoutSession, CheckoutStep, DeliveryOption, OrderConfirmation,
    OrderSummary, ShippingDetails,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{FilterSelection, PriceRange, SortKey};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Local storage namespace for the persisted cart record.
pub const CART_STORAGE_KEY: &str = "eshopee-cart";

/// Local storage namespace for the persisted auth session.
pub const AUTH_STORAGE_KEY: &str = "eshopee-auth";

/// Upper bound of the price slider on the product listing ($2,500.00).
pub const PRICE_RANGE_MAX: Money = Money::from_cents(250_000);

/// Number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;
