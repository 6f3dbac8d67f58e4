//! Cooperative cancellation for in-flight resolution.

use std::sync::Arc;

use tokio::sync::watch;

/// A token that resolution checks, and awaits, to find out whether the
/// request that owns it was cancelled.
#[derive(Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a new token, and a handle that cancels it.
    ///
    /// ```
    /// # use nswag_gen_core::CancellationToken;
    /// let (token, handle) = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    /// handle.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    pub fn new() -> (Self, CancellationHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { rx }, CancellationHandle { tx: Arc::new(tx) })
    }

    /// Creates a token that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    /// Creates a token that is already cancelled.
    pub fn already_cancelled() -> Self {
        let (_, rx) = watch::channel(true);
        Self { rx }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once cancellation is requested. Never completes if the
    /// handle was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::never()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cancels every [`CancellationToken`] created alongside it.
#[derive(Clone, Debug)]
pub struct CancellationHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}
