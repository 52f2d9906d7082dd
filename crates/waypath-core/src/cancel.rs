//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative-cancellation flag backed by an [`AtomicBool`].
///
/// Clones share the same flag, so one clone can be handed to whoever
/// decides to stop a search while the search polls another.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Re-arm the token so it can drive another run.
    #[inline]
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}
