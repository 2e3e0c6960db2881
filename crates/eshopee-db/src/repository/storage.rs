//! # Local Storage Repository
//!
//! Namespaced key/value records, the storefront's equivalent of browser
//! local storage. Each namespace holds one JSON document.
//!
//! ## Record Layout
//! ```text
//! ┌──────────────────┬──────────────────────────────────────┬──────────────┐
//! │ namespace (PK)   │ value (JSON text)                    │ updated_at   │
//! ├──────────────────┼──────────────────────────────────────┼──────────────┤
//! │ eshopee-cart     │ {"items":[{"productId":"3",          │ RFC 3339     │
//! │                  │            "quantity":2}]}           │              │
//! │ eshopee-auth     │ {"user":{...},"isAuthenticated":true}│ RFC 3339     │
//! └──────────────────┴──────────────────────────────────────┴──────────────┘
//! ```
//!
//! Writes are upserts: the latest snapshot replaces the previous one.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use eshopee_core::{AuthSnapshot, CartSnapshot, AUTH_STORAGE_KEY, CART_STORAGE_KEY};

/// A raw row of the `local_storage` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredRecord {
    pub namespace: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for local storage records.
#[derive(Debug, Clone)]
pub struct LocalStorageRepository {
    pool: SqlitePool,
}

impl LocalStorageRepository {
    /// Creates a new LocalStorageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LocalStorageRepository { pool }
    }

    // =========================================================================
    // Raw access
    // =========================================================================

    /// Reads the raw JSON text stored under `namespace`.
    pub async fn get(&self, namespace: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM local_storage WHERE namespace = ?1",
        )
        .bind(namespace)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Reads the full row for `namespace`.
    pub async fn get_record(&self, namespace: &str) -> DbResult<Option<StoredRecord>> {
        let record = sqlx::query_as::<_, StoredRecord>(
            "SELECT namespace, value, updated_at FROM local_storage WHERE namespace = ?1",
        )
        .bind(namespace)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Stores `value` under `namespace`, replacing any previous value.
    pub async fn set(&self, namespace: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();

        debug!(namespace = %namespace, bytes = value.len(), "Writing local storage record");

        sqlx::query(
            r#"
            INSERT INTO local_storage (namespace, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(namespace) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(namespace)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the record for `namespace`.
    ///
    /// ## Returns
    /// `true` if a record was removed.
    pub async fn remove(&self, namespace: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM local_storage WHERE namespace = ?1")
            .bind(namespace)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists stored namespaces in alphabetical order.
    pub async fn namespaces(&self) -> DbResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT namespace FROM local_storage ORDER BY namespace ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    // =========================================================================
    // Typed access
    // =========================================================================

    /// Reads and decodes the JSON record under `namespace`.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing stored yet
    /// * `Ok(Some(value))` - Decoded record
    /// * `Err(DbError::Serialization)` - The stored text does not decode as `T`
    pub async fn load_json<T: DeserializeOwned>(&self, namespace: &str) -> DbResult<Option<T>> {
        match self.get(namespace).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| DbError::serialization(namespace, e)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `namespace`.
    pub async fn save_json<T: Serialize>(&self, namespace: &str, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value).map_err(|e| DbError::serialization(namespace, e))?;
        self.set(namespace, &json).await
    }

    /// The persisted cart record.
    pub async fn load_cart(&self) -> DbResult<Option<CartSnapshot>> {
        self.load_json(CART_STORAGE_KEY).await
    }

    pub async fn save_cart(&self, snapshot: &CartSnapshot) -> DbResult<()> {
        self.save_json(CART_STORAGE_KEY, snapshot).await
    }

    /// The persisted auth session record.
    pub async fn load_auth(&self) -> DbResult<Option<AuthSnapshot>> {
        self.load_json(AUTH_STORAGE_KEY).await
    }

    pub async fn save_auth(&self, snapshot: &AuthSnapshot) -> DbResult<()> {
        self.save_json(AUTH_STORAGE_KEY, snapshot).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use eshopee_core::{CartSnapshotEntry, User};

    async fn repo() -> LocalStorageRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().storage()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repo().await;
        assert_eq!(repo.get("nothing").await.unwrap(), None);
        assert!(repo.load_cart().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let repo = repo().await;
        repo.set("ns", "1").await.unwrap();
        let first = repo.get_record("ns").await.unwrap().unwrap();

        repo.set("ns", "2").await.unwrap();
        let second = repo.get_record("ns").await.unwrap().unwrap();

        assert_eq!(second.value, "2");
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(repo.namespaces().await.unwrap(), vec!["ns".to_string()]);
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = repo().await;
        repo.set("ns", "1").await.unwrap();

        assert!(repo.remove("ns").await.unwrap());
        assert!(!repo.remove("ns").await.unwrap());
        assert!(repo.namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_and_auth_records() {
        let repo = repo().await;

        let cart = CartSnapshot {
            items: vec![CartSnapshotEntry {
                product_id: "3".into(),
                quantity: 2,
            }],
        };
        repo.save_cart(&cart).await.unwrap();
        assert_eq!(repo.load_cart().await.unwrap(), Some(cart));

        let auth = AuthSnapshot {
            user: Some(User::from_email("a@b.com")),
            is_authenticated: true,
        };
        repo.save_auth(&auth).await.unwrap();
        assert_eq!(repo.load_auth().await.unwrap(), Some(auth));

        let raw = repo.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"items":[{"productId":"3","quantity":2}]}"#);
    }

    #[tokio::test]
    async fn test_malformed_record_is_serialization_error() {
        let repo = repo().await;
        repo.set(CART_STORAGE_KEY, "not json").await.unwrap();

        let err = repo.load_cart().await.unwrap_err();
        assert!(matches!(err, DbError::Serialization { .. }));
    }
}
