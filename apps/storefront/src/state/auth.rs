//! # Auth Store
//!
//! Owns the session of the current shopper.
//!
//! ## State Machine
//! ```text
//!                 login / register
//!   ┌───────────┐ ───────────────► ┌───────────┐   Ok(user)   ┌───────────────┐
//!   │ Anonymous │                  │  Loading  │ ───────────► │ Authenticated │
//!   └───────────┘ ◄─────────────── └───────────┘              └───────┬───────┘
//!         ▲           Err(_)                                          │
//!         └──────────────────────────── logout ───────────────────────┘
//! ```
//!
//! Concurrent logins are not deduplicated: whichever call resolves last
//! decides the final state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eshopee_core::validation::{validate_login, validate_registration};
use eshopee_core::{AuthPhase, AuthState, User};
use tracing::{debug, info, warn};

use super::observer::StateObserver;
use crate::auth::{AuthResult, Authenticator};

/// The auth store.
///
/// Cloning is cheap and every clone shares the same session.
#[derive(Clone)]
pub struct AuthStore {
    state: Arc<Mutex<AuthState>>,
    authenticator: Arc<dyn Authenticator>,
    observers: Vec<Arc<dyn StateObserver>>,
}

impl AuthStore {
    pub fn new(
        initial: AuthState,
        authenticator: Arc<dyn Authenticator>,
        observers: Vec<Arc<dyn StateObserver>>,
    ) -> Self {
        AuthStore {
            state: Arc::new(Mutex::new(initial)),
            authenticator,
            observers,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<F>(&self, action: &str, f: F) -> AuthState
    where
        F: FnOnce(AuthState) -> AuthState,
    {
        let mut guard = self.lock();
        let next = f(guard.clone());

        if next != *guard {
            debug!(action, phase = ?next.phase(), "Session changed");
            *guard = next;
            for observer in &self.observers {
                observer.auth_changed(&guard);
            }
        }

        guard.clone()
    }

    /// A copy of the current session.
    pub fn state(&self) -> AuthState {
        self.lock().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.lock().phase()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// Signs in with email and password.
    ///
    /// ## Errors
    /// * `AuthError::Validation` - malformed input; the session is untouched
    /// * Any backend error; the session falls back to anonymous
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        validate_login(email, password)?;

        self.apply("login", AuthState::begin);
        let result = self.authenticator.login(email, password).await;
        self.finish("login", result)
    }

    /// Creates an account and signs in.
    ///
    /// Same error behavior as [`AuthStore::login`].
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        validate_registration(name, email, password)?;

        self.apply("register", AuthState::begin);
        let result = self.authenticator.register(name, email, password).await;
        self.finish("register", result)
    }

    fn finish(&self, action: &str, result: AuthResult<User>) -> AuthResult<User> {
        match result {
            Ok(user) => {
                info!(user_id = %user.id, action, "Signed in");
                self.apply(action, |state| state.complete(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, action, "Sign-in failed");
                self.apply(action, AuthState::fail);
                Err(e)
            }
        }
    }

    /// Signs out.
    pub fn logout(&self) -> AuthState {
        info!("Signed out");
        self.apply("logout", AuthState::logout)
    }

    /// Replaces the signed-in user directly.
    pub fn set_user(&self, user: Option<User>) -> AuthState {
        self.apply("set_user", |state| state.set_user(user))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, MockAuthenticator, DEFAULT_AUTH_DELAY};
    use crate::state::observer::tests::RecordingObserver;
    use async_trait::async_trait;
    use std::time::Duration;

    struct RejectingAuthenticator;

    #[async_trait]
    impl Authenticator for RejectingAuthenticator {
        async fn login(&self, _email: &str, _password: &str) -> AuthResult<User> {
            Err(AuthError::InvalidCredentials)
        }

        async fn register(&self, _name: &str, _email: &str, _password: &str) -> AuthResult<User> {
            Err(AuthError::Unavailable("offline".into()))
        }
    }

    fn store(authenticator: Arc<dyn Authenticator>) -> (AuthStore, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::default());
        let store = AuthStore::new(
            AuthState::anonymous(),
            authenticator,
            vec![recorder.clone() as Arc<dyn StateObserver>],
        );
        (store, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_passes_through_loading() {
        let (store, recorder) = store(Arc::new(MockAuthenticator::default()));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.login("jane@example.com", "pw").await }
        });

        // Let the login task reach its sleep
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.phase(), AuthPhase::Loading);
        assert!(!store.state().is_authenticated);

        tokio::time::sleep(DEFAULT_AUTH_DELAY).await;
        let user = pending.await.unwrap().unwrap();

        assert_eq!(user.id, "1");
        assert_eq!(user.name, "jane");
        assert_eq!(store.phase(), AuthPhase::Authenticated);
        assert_eq!(store.user(), Some(user));
        assert_eq!(recorder.session_count(), 2);
    }

    #[tokio::test]
    async fn test_login_names_user_after_email_local_part() {
        let (store, recorder) = store(Arc::new(MockAuthenticator::instant()));

        let user = store.login("a@b.com", "x").await.unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "a");
        assert_eq!(user.email, "a@b.com");

        let state = store.state();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.user, Some(user));
        assert_eq!(recorder.session_count(), 2);
    }

    #[tokio::test]
    async fn test_register_then_logout() {
        let (store, _) = store(Arc::new(MockAuthenticator::instant()));

        let user = store.register("Jane Doe", "jane@example.com", "pw").await.unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert!(store.state().is_authenticated);

        let state = store.logout();
        assert_eq!(state, AuthState::anonymous());
        assert_eq!(state.phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_state_untouched() {
        let (store, recorder) = store(Arc::new(MockAuthenticator::instant()));

        let err = store.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = store.register("", "a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        assert_eq!(recorder.session_count(), 0);
        assert_eq!(store.state(), AuthState::anonymous());
    }

    #[tokio::test]
    async fn test_backend_failure_returns_to_anonymous() {
        let (store, recorder) = store(Arc::new(RejectingAuthenticator));

        let err = store.login("a@b.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.phase(), AuthPhase::Anonymous);
        assert!(!store.state().is_loading);

        let err = store.register("A", "a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Unavailable(_)));

        // begin + fail for each attempt
        assert_eq!(recorder.session_count(), 4);
    }

    #[test]
    fn test_set_user() {
        let (store, recorder) = store(Arc::new(MockAuthenticator::instant()));

        let state = store.set_user(Some(User::from_email("a@b.com")));
        assert!(state.is_authenticated);

        let state = store.set_user(None);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());

        // Clearing an already empty session is a no-op
        store.set_user(None);
        assert_eq!(recorder.session_count(), 2);
    }
}
