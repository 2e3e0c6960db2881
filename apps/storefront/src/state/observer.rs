//! # State Observers
//!
//! The "on state change" hook the stores call after every mutation that
//! actually changed something. Persistence is one observer; a UI shell that
//! re-renders on change would be another.
//!
//! ## Contract
//! - Called with the store's lock held, so calls arrive in mutation order
//! - Must not block and must not call back into the store
//! - A no-op mutation (unknown product id, same quantity) notifies nobody

use eshopee_core::{AuthState, Cart};

/// Receives store changes.
///
/// Both methods default to doing nothing, so an observer only implements
/// what it cares about.
pub trait StateObserver: Send + Sync {
    /// The cart changed (items or sidebar flag).
    fn cart_changed(&self, _cart: &Cart) {}

    /// The auth session changed.
    fn auth_changed(&self, _auth: &AuthState) {}
}

/// Observer that ignores everything (tests, ephemeral sessions).
pub struct NoOpObserver;

impl StateObserver for NoOpObserver {}
