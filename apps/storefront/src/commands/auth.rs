//! # Auth Commands
//!
//! Session commands for the header avatar, the login page and the
//! register page.

use eshopee_core::{AuthPhase, AuthState, User};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AuthStore;

/// The current session as the UI sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub phase: AuthPhase,
}

impl From<AuthState> for SessionResponse {
    fn from(state: AuthState) -> Self {
        SessionResponse {
            phase: state.phase(),
            user: state.user,
            is_authenticated: state.is_authenticated,
            is_loading: state.is_loading,
        }
    }
}

pub fn get_session(auth: &AuthStore) -> SessionResponse {
    auth.state().into()
}

/// Signs in.
///
/// ## Errors
/// * `VALIDATION_ERROR` - email without `@` or empty password
/// * `INVALID_CREDENTIALS` - rejected by the backend
pub async fn login(auth: &AuthStore, email: &str, password: &str) -> Result<SessionResponse, ApiError> {
    debug!(email = %email, "login command");
    auth.login(email, password).await?;
    Ok(get_session(auth))
}

/// Creates an account and signs in.
///
/// ## Errors
/// Same as [`login`], plus `VALIDATION_ERROR` for an empty name.
pub async fn register(
    auth: &AuthStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<SessionResponse, ApiError> {
    debug!(email = %email, "register command");
    auth.register(name, email, password).await?;
    Ok(get_session(auth))
}

pub fn logout(auth: &AuthStore) -> SessionResponse {
    debug!("logout command");
    auth.logout().into()
}
