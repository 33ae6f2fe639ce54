use std::sync::{Arc, Mutex, MutexGuard};

use tee_model::WorkerId;
use tracing::{info, warn};

use crate::browser::Session;

/// Session of a worker that completed a booking.
pub struct KeptSession {
    pub worker: WorkerId,
    /// Start time the worker booked, as displayed.
    pub time_label: String,
    session: Box<dyn Session>,
}

/// Holds the sessions of completed workers until the operator is done with them.
///
/// Completed sessions stay open so the confirmation page can be inspected;
/// everything else is closed by the worker itself.
#[derive(Clone, Default)]
pub struct SessionVault {
    kept: Arc<Mutex<Vec<KeptSession>>>,
}

impl SessionVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<KeptSession>> {
        self.kept.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn keep(&self, worker: WorkerId, time_label: impl Into<String>, session: Box<dyn Session>) {
        self.lock().push(KeptSession {
            worker,
            time_label: time_label.into(),
            session,
        });
    }

    /// Workers that completed, with the time they booked, in completion order.
    pub fn bookings(&self) -> Vec<(WorkerId, String)> {
        self.lock()
            .iter()
            .map(|k| (k.worker, k.time_label.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every kept session. Returns how many were closed cleanly.
    pub async fn close_all(&self) -> usize {
        let kept = std::mem::take(&mut *self.lock());
        let mut closed = 0;
        for mut k in kept {
            match k.session.close().await {
                Ok(()) => {
                    closed += 1;
                    info!(worker = %k.worker, "browser session closed");
                }
                Err(e) => warn!(worker = %k.worker, error = %e, "failed to close browser session"),
            }
        }
        closed
    }
}

impl std::fmt::Debug for SessionVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVault").field("kept", &self.len()).finish()
    }
}
