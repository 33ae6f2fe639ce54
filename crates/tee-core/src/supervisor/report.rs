use std::{fmt, time::Duration};

use tee_model::{WorkerId, WorkerOutcome};

use super::PoolState;

/// What a pool run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Workers started.
    pub launched: u64,
    /// Most workers alive at the same time.
    pub peak_active: usize,
    pub completed: usize,
    pub failed: usize,
    pub canceled: usize,
    pub crashed: usize,
    /// Successful workers with the start time each booked, in completion order.
    pub bookings: Vec<(WorkerId, String)>,
    /// Time from the booking window opening to the end of the run.
    pub elapsed: Duration,
    /// Pool state when the run ended.
    pub pool: PoolState,
}

impl PoolReport {
    pub fn record(&mut self, outcome: WorkerOutcome) {
        match outcome {
            WorkerOutcome::Completed => self.completed += 1,
            WorkerOutcome::Failed => self.failed += 1,
            WorkerOutcome::Canceled => self.canceled += 1,
            WorkerOutcome::Crashed => self.crashed += 1,
        }
    }

    /// First worker that booked, with its time.
    pub fn winner(&self) -> Option<(WorkerId, &str)> {
        self.bookings.first().map(|(id, label)| (*id, label.as_str()))
    }

    pub fn is_booked(&self) -> bool {
        !self.bookings.is_empty()
    }

    /// Workers that ended one way or another.
    pub fn settled(&self) -> usize {
        self.completed + self.failed + self.canceled + self.crashed
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner() {
            Some((id, label)) => write!(f, "booked {label} by {id}")?,
            None => f.write_str("nothing booked")?,
        }
        write!(
            f,
            " (launched={}, completed={}, failed={}, canceled={}, crashed={}, elapsed={:.1}s)",
            self.launched,
            self.completed,
            self.failed,
            self.canceled,
            self.crashed,
            self.elapsed.as_secs_f64()
        )
    }
}
