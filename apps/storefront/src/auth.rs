//! # Authentication Backend
//!
//! The seam between the auth store and whatever actually checks
//! credentials. The storefront ships a mock that accepts any well-formed
//! credentials after a short simulated round-trip.
//!
//! ## Flow
//! ```text
//! AuthStore::login(email, password)
//!     │
//!     ├── validate_login()            reject malformed input, no state change
//!     ├── state.begin()               is_loading = true
//!     ├── authenticator.login().await
//!     │       ├── Ok(user)  ──► state.complete(user)
//!     │       └── Err(_)    ──► state.fail()
//!     ▼
//! observers notified on each change
//! ```

use std::time::Duration;

use async_trait::async_trait;
use eshopee_core::{User, ValidationError};
use thiserror::Error;
use tracing::debug;

/// Default simulated round-trip for the mock backend.
pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(1000);

/// Errors an authentication backend can report.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Checks credentials and produces the signed-in user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> AuthResult<User>;

    async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<User>;
}

/// Accepts any credentials after `delay`.
///
/// - Login yields user id `"1"` named after the part of the email before `@`
/// - Register yields a fresh id and the given name
#[derive(Debug, Clone)]
pub struct MockAuthenticator {
    delay: Duration,
}

impl MockAuthenticator {
    pub fn new(delay: Duration) -> Self {
        MockAuthenticator { delay }
    }

    /// A mock that answers immediately.
    pub fn instant() -> Self {
        MockAuthenticator::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn simulate_round_trip(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        MockAuthenticator::new(DEFAULT_AUTH_DELAY)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, email: &str, _password: &str) -> AuthResult<User> {
        debug!(email = %email, delay = ?self.delay, "Mock login");
        self.simulate_round_trip().await;
        Ok(User::from_email(email))
    }

    async fn register(&self, name: &str, email: &str, _password: &str) -> AuthResult<User> {
        debug!(email = %email, delay = ?self.delay, "Mock register");
        self.simulate_round_trip().await;
        Ok(User::registered(name, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_login_derives_user_from_email() {
        let user = MockAuthenticator::instant()
            .login("sam@example.com", "secret")
            .await
            .unwrap();

        assert_eq!(user.id, "1");
        assert_eq!(user.name, "sam");
        assert_eq!(user.email, "sam@example.com");
    }

    #[tokio::test]
    async fn test_mock_register_keeps_name() {
        let user = MockAuthenticator::instant()
            .register("Sam Doe", "sam@example.com", "secret")
            .await
            .unwrap();

        assert_eq!(user.name, "Sam Doe");
        assert_ne!(user.id, "1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_waits_for_delay() {
        let auth = MockAuthenticator::default();
        let started = tokio::time::Instant::now();

        auth.login("a@b.com", "pw").await.unwrap();

        assert!(started.elapsed() >= DEFAULT_AUTH_DELAY);
    }
}
