//! # Auth State
//!
//! The signed-in user and the session flags, as a pure value. Like the
//! cart, every transition consumes the state and returns the next one; the
//! app-side `AuthStore` drives the transitions around an authenticator call.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────────┐  begin()   ┌────────────┐  complete(user) ┌─────────┐ │
//! │   │ Anonymous  │──────────► │  Loading   │───────────────► │ Authen- │ │
//! │   │            │ ◄───────── │            │                 │ ticated │ │
//! │   └────────────┘   fail()   └────────────┘                 └────┬────┘ │
//! │         ▲                                                       │      │
//! │         └───────────────────────── logout() ────────────────────┘      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Avatar service used for generated profile pictures.
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

// =============================================================================
// User
// =============================================================================

/// A signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
}

impl User {
    /// The deterministic user the mock login produces.
    ///
    /// ## Example
    /// ```rust
    /// use eshopee_core::User;
    ///
    /// let user = User::from_email("a@b.com");
    /// assert_eq!(user.id, "1");
    /// assert_eq!(user.name, "a");
    /// ```
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default();
        User {
            id: "1".to_string(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: avatar_url(email),
        }
    }

    /// A freshly registered user with a new id.
    pub fn registered(name: &str, email: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: avatar_url(email),
        }
    }
}

/// Generated avatar URL seeded by `seed`.
pub fn avatar_url(seed: &str) -> String {
    format!("{}?seed={}", AVATAR_BASE_URL, seed)
}

// =============================================================================
// Auth State
// =============================================================================

/// Coarse view of [`AuthState`] for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AuthPhase {
    Anonymous,
    Loading,
    Authenticated,
}

/// Current session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    /// Signed-out state.
    pub fn anonymous() -> Self {
        AuthState::default()
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    /// A login or register call started.
    pub fn begin(mut self) -> Self {
        self.is_loading = true;
        self
    }

    /// The call resolved with `user`.
    pub fn complete(self, user: User) -> Self {
        AuthState {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    /// The call failed: back to anonymous, not loading.
    pub fn fail(self) -> Self {
        AuthState::anonymous()
    }

    /// Clears the user and the authenticated flag.
    pub fn logout(self) -> Self {
        AuthState {
            is_loading: self.is_loading,
            ..AuthState::anonymous()
        }
    }

    /// Replaces the user; authenticated exactly when a user is present.
    pub fn set_user(mut self, user: Option<User>) -> Self {
        self.is_authenticated = user.is_some();
        self.user = user;
        self
    }

    /// The persisted form of this session.
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    /// Restores a session from its persisted form.
    ///
    /// A record claiming to be authenticated without a user restores as
    /// anonymous.
    pub fn rehydrate(snapshot: AuthSnapshot) -> Self {
        let is_authenticated = snapshot.is_authenticated && snapshot.user.is_some();
        AuthState {
            user: if is_authenticated { snapshot.user } else { None },
            is_authenticated,
            is_loading: false,
        }
    }
}

/// Persisted session record stored under [`crate::AUTH_STORAGE_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
