//! # Eshopee Storefront Library
//!
//! Session state for the Eshopee storefront: the cart store, the auth
//! store, their local persistence, and the commands a UI calls.
//!
//! ## Module Organization
//! ```text
//! eshopee_storefront/
//! ├── lib.rs              ◄─── You are here (bootstrap & tracing)
//! ├── auth.rs             ◄─── Authenticator seam + mock backend
//! ├── state/
//! │   ├── mod.rs          ◄─── State type exports
//! │   ├── cart.rs         ◄─── CartStore (Arc<Mutex<Cart>>)
//! │   ├── auth.rs         ◄─── AuthStore (Arc<Mutex<AuthState>>)
//! │   ├── observer.rs     ◄─── StateObserver hook
//! │   ├── persistence.rs  ◄─── Background writer to local storage
//! │   ├── config.rs       ◄─── StorefrontConfig (toml + env)
//! │   └── db.rs           ◄─── Open storage, rehydrate stores
//! ├── commands/
//! │   ├── mod.rs          ◄─── Command exports
//! │   ├── cart.rs         ◄─── Cart manipulation commands
//! │   ├── product.rs      ◄─── Catalog browse/filter commands
//! │   ├── auth.rs         ◄─── Login / register / logout
//! │   └── checkout.rs     ◄─── Order summary and placement
//! └── error.rs            ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use eshopee_storefront::{commands, Storefront};
//! use eshopee_storefront::state::StorefrontConfig;
//!
//! # async fn demo() -> Result<(), eshopee_storefront::error::ApiError> {
//! let shop = Storefront::bootstrap(StorefrontConfig::load(None)?).await?;
//!
//! commands::cart::add_to_cart(shop.cart(), shop.catalog(), "3", None)?;
//! let summary = commands::checkout::order_summary(shop.cart(), shop.config(), None);
//! println!("Total: {}", summary.totals.total);
//!
//! shop.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use eshopee_core::{Catalog, CheckoutPolicy};
use eshopee_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{Authenticator, MockAuthenticator};
use error::ApiError;
use state::{
    open_database, restore_cart, restore_session, AuthStore, CartStore, PersistenceHandle,
    PersistenceWriter, StateObserver, StorefrontConfig,
};

/// One storefront session: configuration, catalog and both stores.
///
/// There are no globals; everything a command needs is reached from here.
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: CartStore,
    auth: AuthStore,
    database: Database,
    persistence: PersistenceHandle,
}

impl Storefront {
    /// Starts a session with the mock authenticator.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Storefront Startup                                │
    /// │                                                                         │
    /// │  1. Load Catalog ─────────────────────────────────────────────────────► │
    /// │     • Embedded product and category data                                │
    /// │                                                                         │
    /// │  2. Open Local Storage ───────────────────────────────────────────────► │
    /// │     • SQLite file (or in-memory), migrations applied                    │
    /// │                                                                         │
    /// │  3. Rehydrate ────────────────────────────────────────────────────────► │
    /// │     • Cart from "eshopee-cart" (unknown products dropped)               │
    /// │     • Session from "eshopee-auth"                                       │
    /// │                                                                         │
    /// │  4. Start Persistence Writer ─────────────────────────────────────────► │
    /// │     • Registered as observer on both stores                             │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn bootstrap(config: StorefrontConfig) -> Result<Self, ApiError> {
        let authenticator = Arc::new(MockAuthenticator::new(config.auth_delay()));
        Self::with_authenticator(config, authenticator).await
    }

    /// Starts a session with a custom authentication backend.
    pub async fn with_authenticator(
        config: StorefrontConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, ApiError> {
        info!(store = %config.store.name, "Starting storefront session");

        let catalog = Arc::new(Catalog::builtin()?);
        info!(
            products = catalog.len(),
            categories = catalog.categories().len(),
            "Catalog loaded"
        );

        let database = open_database(&config).await?;
        let storage = database.storage();

        let cart = restore_cart(&storage, &catalog).await;
        let session = restore_session(&storage).await;

        let persistence = PersistenceWriter::new(storage).start();
        let observers: Vec<Arc<dyn StateObserver>> = vec![Arc::new(persistence.clone())];

        info!("State initialized");

        Ok(Storefront {
            cart: CartStore::new(cart, observers.clone()),
            auth: AuthStore::new(session, authenticator, observers),
            config,
            catalog,
            database,
            persistence,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        self.config.checkout_policy()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Waits until every change so far is in local storage.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    /// Writes pending changes, stops the writer and closes storage.
    pub async fn shutdown(&self) {
        self.persistence.shutdown().await;
        self.database.close().await;
        info!("Storefront session closed");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=eshopee=trace` - Show trace for eshopee crates only
/// - Default: `info,eshopee=debug,sqlx=warn`
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eshopee=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
