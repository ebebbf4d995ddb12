//! Cancellation of in-flight calls.

use std::sync::Arc;

use tokio::sync::watch;

/// Cancels the calls it is passed to.
///
/// Clones share one flag; once cancelled a handle stays cancelled, so a call
/// started with an already-fired handle fails immediately.
///
/// # Example
///
/// ```ignore
/// let cancel = CancelHandle::new();
/// let call = service.execute_cancellable(request, &cancel);
/// cancel.cancel();
/// assert!(call.await.unwrap_err().is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Create a handle that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Fire the handle. Idempotent.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Whether the handle has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolve once the handle fires.
    pub async fn cancelled(&self) {
        let mut fired = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = fired.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
