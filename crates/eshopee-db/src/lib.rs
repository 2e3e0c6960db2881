//! # eshopee-db: Local Storage for Eshopee
//!
//! This crate provides the storefront's client-local storage: a namespaced
//! key/value table in SQLite, holding the persisted cart and auth records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Eshopee Data Flow                                │
//! │                                                                         │
//! │  CartStore / AuthStore mutation                                        │
//! │       │ snapshot                                                        │
//! │       ▼                                                                 │
//! │  Persistence writer task (apps/storefront)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    eshopee-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repository      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ LocalStorageRepo   │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ get / set / remove │  │ 001_local_ │  │   │
//! │  │   └───────────────┘    └────────────────────┘  │  storage   │  │   │
//! │  │                                                └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: <data dir>/eshopee.db   (or :memory:)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Local storage repository
//!
//! ## Usage
//!
//! ```rust,no_run
//! use eshopee_db::{Database, DbConfig};
//!
//! # async fn demo() -> Result<(), eshopee_db::DbError> {
//! let db = Database::new(DbConfig::in_memory()).await?;
//!
//! db.storage().set("eshopee-cart", r#"{"items":[]}"#).await?;
//! let raw = db.storage().get("eshopee-cart").await?;
//! assert!(raw.is_some());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::storage::{LocalStorageRepository, StoredRecord};
