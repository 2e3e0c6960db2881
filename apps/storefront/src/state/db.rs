//! # Local Storage State
//!
//! Opens the local storage database and rehydrates the stores at startup.
//!
//! ## Rehydration Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record             Outcome                                             │
//! │  ──────             ───────                                             │
//! │  missing            fresh state                                         │
//! │  malformed JSON     fresh state, warning logged                         │
//! │  cart line whose    line dropped, warning logged                        │
//! │  product is gone                                                        │
//! │  auth record        authenticated only if a user is present,            │
//! │                     never loading                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A broken record never stops the storefront from starting.

use eshopee_core::{AuthState, Cart, Catalog};
use eshopee_db::{Database, DbConfig, DbError, DbResult, LocalStorageRepository};
use tracing::{info, warn};

use super::config::StorefrontConfig;

/// Opens (and migrates) the database described by `config`.
pub async fn open_database(config: &StorefrontConfig) -> DbResult<Database> {
    let db_config = if config.storage.in_memory {
        DbConfig::in_memory()
    } else {
        let path = config.database_path().ok_or_else(|| {
            DbError::ConnectionFailed("No database path available".to_string())
        })?;
        DbConfig::new(path)
    };

    info!(
        path = ?db_config.database_path,
        in_memory = db_config.in_memory,
        "Opening local storage"
    );

    Database::new(db_config).await
}

/// Rebuilds the cart from its persisted snapshot.
///
/// Products are looked up in `catalog` so restored lines carry current
/// product data. The cart sidebar always starts closed.
pub async fn restore_cart(storage: &LocalStorageRepository, catalog: &Catalog) -> Cart {
    match storage.load_cart().await {
        Ok(Some(snapshot)) => {
            let (cart, missing) = Cart::rehydrate(&snapshot, catalog);
            if !missing.is_empty() {
                warn!(?missing, "Dropped cart lines for unknown products");
            }
            info!(lines = cart.line_count(), "Restored cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Could not restore cart, starting empty");
            Cart::new()
        }
    }
}

/// Rebuilds the auth session from its persisted snapshot.
pub async fn restore_session(storage: &LocalStorageRepository) -> AuthState {
    match storage.load_auth().await {
        Ok(Some(snapshot)) => {
            let state = AuthState::rehydrate(snapshot);
            info!(authenticated = state.is_authenticated, "Restored session");
            state
        }
        Ok(None) => AuthState::anonymous(),
        Err(e) => {
            warn!(error = %e, "Could not restore session, starting signed out");
            AuthState::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eshopee_core::{
        AuthSnapshot, CartSnapshot, CartSnapshotEntry, User, AUTH_STORAGE_KEY, CART_STORAGE_KEY,
    };

    async fn storage() -> LocalStorageRepository {
        open_database(&StorefrontConfig::ephemeral())
            .await
            .unwrap()
            .storage()
    }

    fn entry(id: &str, quantity: u32) -> CartSnapshotEntry {
        CartSnapshotEntry {
            product_id: id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_empty_storage_gives_fresh_state() {
        let storage = storage().await;
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(restore_cart(&storage, &catalog).await, Cart::new());
        assert_eq!(restore_session(&storage).await, AuthState::anonymous());
    }

    #[tokio::test]
    async fn test_restore_cart_drops_unknown_products() {
        let storage = storage().await;
        let catalog = Catalog::builtin().unwrap();
        storage
            .save_cart(&CartSnapshot {
                items: vec![entry("2", 3), entry("ghost", 1)],
            })
            .await
            .unwrap();

        let cart = restore_cart(&storage, &catalog).await;
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 3);
        assert!(!cart.is_open());
    }

    #[tokio::test]
    async fn test_malformed_records_are_ignored() {
        let storage = storage().await;
        let catalog = Catalog::builtin().unwrap();
        storage.set(CART_STORAGE_KEY, "{broken").await.unwrap();
        storage.set(AUTH_STORAGE_KEY, "42").await.unwrap();

        assert!(restore_cart(&storage, &catalog).await.is_empty());
        assert_eq!(restore_session(&storage).await, AuthState::anonymous());
    }

    #[tokio::test]
    async fn test_restore_session() {
        let storage = storage().await;
        let user = User::from_email("kim@example.com");
        storage
            .save_auth(&AuthSnapshot {
                user: Some(user.clone()),
                is_authenticated: true,
            })
            .await
            .unwrap();

        let state = restore_session(&storage).await;
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.user, Some(user));
    }
}
