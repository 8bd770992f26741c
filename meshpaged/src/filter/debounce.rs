use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs the most recently armed task once the quiet period elapses.
/// Arming again before then cancels the earlier task; it never runs.
pub struct Debouncer {
    quiet_period: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: Mutex::new(None),
        }
    }

    /// Cancel the pending task, if any, and schedule `task`.
    /// Must be called from within a Tokio runtime.
    pub fn arm<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().replace(token.clone()) {
            previous.cancel();
        }

        let quiet_period = self.quiet_period;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::trace!("Debounced task superseded");
                }
                _ = tokio::time::sleep(quiet_period) => task(),
            }
        });
    }

    /// Cancel the pending task without scheduling another.
    pub fn cancel(&self) {
        if let Some(token) = self.lock().take() {
            token.cancel();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
