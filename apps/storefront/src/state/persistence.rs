//! # Persistence Writer
//!
//! Writes store snapshots to local storage from a background task, keeping
//! the store mutations themselves free of I/O.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartStore::add_item ──► cart_changed(&cart)                           │
//! │                               │ snapshot + unbounded send (no await)    │
//! │                               ▼                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  mpsc channel (FIFO)                                            │   │
//! │  │  Cart(snapshot) │ Auth(snapshot) │ Flush(ack) │ Shutdown(ack)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                               │                                          │
//! │                               ▼                                          │
//! │  PersistenceWriter::run ──► storage.save_cart / save_auth              │
//! │                               │                                          │
//! │                               └── write error? log it, keep going      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the channel is FIFO, a `Flush` acknowledgement means every
//! snapshot sent before it has been written (or logged as failed).

use eshopee_core::{AuthSnapshot, AuthState, Cart, CartSnapshot};
use eshopee_db::LocalStorageRepository;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::observer::StateObserver;

/// Commands for the writer task.
#[derive(Debug)]
enum PersistCommand {
    Cart(CartSnapshot),
    Auth(AuthSnapshot),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Background task that owns the storage writes.
pub struct PersistenceWriter {
    storage: LocalStorageRepository,
}

impl PersistenceWriter {
    /// Creates a writer for `storage`.
    pub fn new(storage: LocalStorageRepository) -> Self {
        PersistenceWriter { storage }
    }

    /// Spawns the writer on the current tokio runtime and returns its handle.
    pub fn start(self) -> PersistenceHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        PersistenceHandle { cmd_tx }
    }

    /// Main writer loop.
    async fn run(self, mut cmd_rx: mpsc::UnboundedReceiver<PersistCommand>) {
        info!("Persistence writer started");

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                PersistCommand::Cart(snapshot) => {
                    debug!(lines = snapshot.items.len(), "Persisting cart");
                    if let Err(e) = self.storage.save_cart(&snapshot).await {
                        error!(error = %e, "Failed to persist cart");
                    }
                }
                PersistCommand::Auth(snapshot) => {
                    debug!(authenticated = snapshot.is_authenticated, "Persisting session");
                    if let Err(e) = self.storage.save_auth(&snapshot).await {
                        error!(error = %e, "Failed to persist session");
                    }
                }
                PersistCommand::Flush(ack) => {
                    let _ = ack.send(());
                }
                PersistCommand::Shutdown(ack) => {
                    info!("Persistence writer shutting down");
                    let _ = ack.send(());
                    return;
                }
            }
        }

        debug!("Persistence channel closed");
    }
}

/// Handle to the writer task. Cheap to clone; doubles as the stores'
/// [`StateObserver`].
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    cmd_tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistenceHandle {
    fn send(&self, cmd: PersistCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("Persistence writer is gone; change not persisted");
        }
    }

    /// Waits until every snapshot sent so far has been handled.
    ///
    /// Returns immediately if the writer has stopped.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.cmd_tx.send(PersistCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Drains pending writes and stops the writer.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.cmd_tx.send(PersistCommand::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Whether the writer task is still accepting snapshots.
    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }
}

impl StateObserver for PersistenceHandle {
    fn cart_changed(&self, cart: &Cart) {
        self.send(PersistCommand::Cart(cart.snapshot()));
    }

    fn auth_changed(&self, auth: &AuthState) {
        self.send(PersistCommand::Auth(auth.snapshot()));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
