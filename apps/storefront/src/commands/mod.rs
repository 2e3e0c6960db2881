//! # Storefront Commands Module
//!
//! All operations exposed to the UI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog listing, filtering, product page
//! ├── cart.rs      ◄─── Cart manipulation and sidebar
//! ├── auth.rs      ◄─── Session, login, register, logout
//! └── checkout.rs  ◄─── Order summary, delivery options, place order
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI event (click "Add to Cart")                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::cart::add_to_cart(                                          │
//! │      shop.cart(),       ◄── only the state it needs                    │
//! │      shop.catalog(),                                                   │
//! │      "3",               ◄── from the UI                                │
//! │      None,              ◄── optional quantity                          │
//! │  ) -> Result<CartResponse, ApiError>                                   │
//! │         │                                                               │
//! │         │ (camelCase JSON)                                              │
//! │         ▼                                                               │
//! │  UI re-renders from CartResponse                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the catalog
//! fn list_products(catalog: &Catalog, filter: &FilterSelection)
//!
//! // Only needs the cart
//! fn get_cart(cart: &CartStore)
//!
//! // Needs both
//! fn add_to_cart(cart: &CartStore, catalog: &Catalog, ...)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod product;
