//! # State Module
//!
//! Stores and startup state for one storefront session.
//!
//! Instead of a single global state object, each concern gets its own
//! store. Commands take exactly the stores they need, and tests build a
//! store in isolation with whatever observers they want.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Storefront::bootstrap                      │   │
//! │  │  config  = StorefrontConfig::load(..)                           │   │
//! │  │  db      = open_database(&config)                               │   │
//! │  │  cart    = restore_cart(..)      auth = restore_session(..)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartStore   │  │  AuthStore   │  │ StorefrontConfig │              │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  checkout policy │              │
//! │  │    Cart>>    │  │  AuthState>> │  │  auth delay      │              │
//! │  └──────┬───────┘  └──────┬───────┘  └──────────────────┘              │
//! │         │  StateObserver  │                                             │
//! │         └────────┬────────┘                                             │
//! │                  ▼                                                      │
//! │         PersistenceHandle ──► writer task ──► local_storage table      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore / AuthStore: Arc<Mutex<T>>, one mutation at a time        │
//! │  • StorefrontConfig: read-only after load                              │
//! │  • PersistenceHandle: unbounded channel sender, never blocks           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod config;
mod db;
mod observer;
mod persistence;

pub use auth::AuthStore;
pub use cart::CartStore;
pub use config::{
    AuthSettings, CheckoutSettings, ConfigError, ConfigResult, StorageSettings, StoreSettings,
    StorefrontConfig,
};
pub use db::{open_database, restore_cart, restore_session};
pub use observer::{NoOpObserver, StateObserver};
pub use persistence::{PersistenceHandle, PersistenceWriter};
