//! Search-input debouncing
//!
//! Lives at the call site, never inside [`crate::FilterEngine`]. Each
//! keystroke replaces the pending timer, so only the last query within the
//! delay window reaches the callback.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Default delay between the last keystroke and the filter run
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Last-write-wins scheduler for search queries
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Create debouncer with the given delay
    #[inline]
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Configured delay
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `on_fire(query)` after the delay, superseding any pending run
    pub fn schedule<F>(&mut self, query: impl Into<String>, on_fire: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.cancel();

        let query = query.into();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!(query = %query, "debounced search fired");
            on_fire(query);
        }));
    }

    /// Drop the pending run, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a run is scheduled and has not fired yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
