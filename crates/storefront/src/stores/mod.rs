//! Session-scoped state stores.
//!
//! A shop owns exactly one [`FilterStore`] and one [`CartStore`]. Components
//! receive cloned handles to the same underlying state, so every reader sees
//! every mutation as soon as it returns. Readers that need change
//! notification call `subscribe()` and get a `tokio::sync::watch` receiver.
//!
//! Every store handle is bound to the [`StoreScope`] of the shop that created
//! it. Once the shop is torn down the scope closes and every further access
//! through any handle fails with [`StoreError::ScopeClosed`].

mod cart;
mod filter;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

pub use cart::CartStore;
pub use filter::FilterStore;

/// Misuse of a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The owning shop has been torn down.
    #[error("{store} accessed outside its scope: the owning shop has been torn down")]
    ScopeClosed { store: &'static str },

    /// No shop is available for the current request.
    #[error("{store} accessed without a provider: the request is not inside a shop session")]
    MissingProvider { store: &'static str },
}

/// Lifetime of the stores belonging to one shop.
///
/// Cloning yields another handle to the same scope.
#[derive(Debug, Clone)]
pub struct StoreScope {
    closed: Arc<watch::Sender<bool>>,
}

impl Default for StoreScope {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreScope {
    /// Create a new open scope.
    #[must_use]
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            closed: Arc::new(closed),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !*self.closed.borrow()
    }

    /// Close the scope. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Fail with [`StoreError::ScopeClosed`] naming `store` if the scope is closed.
    ///
    /// # Errors
    ///
    /// Returns an error once [`close`](Self::close) has been called.
    pub fn ensure_open(&self, store: &'static str) -> Result<(), StoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::ScopeClosed { store })
        }
    }

    /// Resolves once the scope is closed.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|closed| *closed).await;
    }
}
