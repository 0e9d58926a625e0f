//! Cooperative cancellation.
//!
//! [`CancellationToken`] lets a caller abandon an extraction that is no
//! longer wanted (for instance when the HTTP client disconnects). The
//! pipeline checks the token at batch boundaries only: encode work already
//! handed to the worker pool runs to completion, no further batches are
//! scheduled, and cleanup of the transient input copy still happens.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A clonable cancellation flag.
///
/// All clones share the same flag; cancelling any of them cancels the
/// extraction they are attached to.
///
/// # Example
///
/// ```
/// use framepack::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](CancellationToken::cancel) has been
    /// called on any clone of this token.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
