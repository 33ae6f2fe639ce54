use std::{fmt, sync::Arc};

use crate::{
    clock::{Clock, SystemClock},
    signal::BookingSignal,
    store::ProfileStore,
    vault::SessionVault,
};

/// Shared build context passed to all runners.
#[derive(Clone)]
pub struct BuildContext {
    signal: BookingSignal,
    clock: Arc<dyn Clock>,
    store: Arc<dyn ProfileStore>,
    vault: SessionVault,
}

impl BuildContext {
    /// Create a context around `store` with a fresh signal and vault and a UTC system clock.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            signal: BookingSignal::new(),
            clock: Arc::new(SystemClock::utc()),
            store,
            vault: SessionVault::new(),
        }
    }

    /// Completion flag shared by every worker of the pool.
    pub fn signal(&self) -> &BookingSignal {
        &self.signal
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Where completed workers leave their sessions.
    pub fn vault(&self) -> &SessionVault {
        &self.vault
    }

    pub fn with_signal(mut self, signal: BookingSignal) -> Self {
        self.signal = signal;
        self
    }

    /// Replace the clock and return updated context.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_vault(mut self, vault: SessionVault) -> Self {
        self.vault = vault;
        self
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("booked", &self.signal.is_set())
            .field("kept_sessions", &self.vault.len())
            .field("store", &"<store>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BuildContext;
    use crate::{signal::BookingSignal, testing::MemoryStore, vault::SessionVault};
    use std::sync::Arc;

    #[test]
    fn new_context_starts_unbooked_and_empty() {
        let ctx = BuildContext::new(Arc::new(MemoryStore::new()));
        assert!(!ctx.signal().is_set());
        assert!(ctx.vault().is_empty());
    }

    #[test]
    fn clones_share_the_signal() {
        let ctx = BuildContext::new(Arc::new(MemoryStore::new()));
        let other = ctx.clone();
        assert!(other.signal().mark());
        assert!(ctx.signal().is_set());
    }

    #[test]
    fn with_signal_replaces_the_flag() {
        let signal = BookingSignal::new();
        signal.mark();
        let ctx = BuildContext::new(Arc::new(MemoryStore::new()))
            .with_signal(signal)
            .with_vault(SessionVault::new());
        assert!(ctx.signal().is_set());
    }

    #[test]
    fn debug_hides_the_store() {
        let ctx = BuildContext::new(Arc::new(MemoryStore::new()));
        let s = format!("{ctx:?}");
        assert!(s.contains("booked: false"));
        assert!(s.contains("<store>"));
    }
}
