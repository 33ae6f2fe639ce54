use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio_util::sync::CancellationToken;

/// Process-wide "a reservation went through" flag.
///
/// Cloned into the supervisor and every worker. Setting it is idempotent;
/// [`BookingSignal::mark`] reports whether the caller was the first to set it.
/// Two workers may both reach the booking stage before either sets the flag,
/// so more than one reservation can be made.
#[derive(Debug, Clone, Default)]
pub struct BookingSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    done: AtomicBool,
    wake: CancellationToken,
}

impl BookingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Returns `true` only for the first caller.
    pub fn mark(&self) -> bool {
        let first = !self.inner.done.swap(true, Ordering::AcqRel);
        self.inner.wake.cancel();
        first
    }

    pub fn is_set(&self) -> bool {
        self.inner.done.load(Ordering::Acquire)
    }

    /// Resolves once the flag is set (immediately if it already is).
    pub async fn wait(&self) {
        self.inner.wake.cancelled().await
    }
}
