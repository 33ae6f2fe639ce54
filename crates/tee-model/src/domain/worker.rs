use std::fmt;

use serde::{Deserialize, Serialize};

/// Supervisor-assigned worker identifier.
///
/// Ids are handed out in strictly increasing order by a single supervisor and
/// are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(u64);

impl WorkerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Stage of a booking worker.
///
/// Non-terminal states follow each other in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerState {
    Init,
    Connecting,
    Authenticating,
    ConfiguringSearch,
    DiscoveringSlots,
    Booking,
    Completed,
    Failed,
    Canceled,
}

impl WorkerState {
    /// `true` for states a worker never leaves.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerState::Completed | WorkerState::Failed | WorkerState::Canceled
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Init => "init",
            WorkerState::Connecting => "connecting",
            WorkerState::Authenticating => "authenticating",
            WorkerState::ConfiguringSearch => "configuring-search",
            WorkerState::DiscoveringSlots => "discovering-slots",
            WorkerState::Booking => "booking",
            WorkerState::Completed => "completed",
            WorkerState::Failed => "failed",
            WorkerState::Canceled => "canceled",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a worker run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerOutcome {
    /// Reservation submitted.
    Completed,
    /// A guard failed (site unreachable, control missing, no suitable slot).
    Failed,
    /// Cancelled by the supervisor.
    Canceled,
    /// Unexpected error; a crash record was written.
    Crashed,
}

impl WorkerOutcome {
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, WorkerOutcome::Completed)
    }

    /// Return label value for logs.
    #[inline]
    pub const fn as_label(&self) -> &'static str {
        match self {
            WorkerOutcome::Completed => "completed",
            WorkerOutcome::Failed => "failed",
            WorkerOutcome::Canceled => "canceled",
            WorkerOutcome::Crashed => "crashed",
        }
    }

    /// Terminal state recorded for this outcome.
    pub const fn final_state(&self) -> WorkerState {
        match self {
            WorkerOutcome::Completed => WorkerState::Completed,
            WorkerOutcome::Canceled => WorkerState::Canceled,
            WorkerOutcome::Failed | WorkerOutcome::Crashed => WorkerState::Failed,
        }
    }
}

/// Snapshot of a worker as seen by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub state: WorkerState,
    pub completed: bool,
}

impl WorkerRecord {
    /// Fresh record for a just-launched worker.
    pub const fn launched(id: WorkerId) -> Self {
        Self {
            id,
            state: WorkerState::Init,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = WorkerId::new(1);
        assert!(a.next() > a);
        assert_eq!(a.next().get(), 2);
        assert_eq!(a.to_string(), "worker-1");
    }

    #[test]
    fn only_final_states_are_terminal() {
        let running = [
            WorkerState::Init,
            WorkerState::Connecting,
            WorkerState::Authenticating,
            WorkerState::ConfiguringSearch,
            WorkerState::DiscoveringSlots,
            WorkerState::Booking,
        ];
        for s in running {
            assert!(!s.is_terminal(), "{s} should not be terminal");
        }
        for s in [WorkerState::Completed, WorkerState::Failed, WorkerState::Canceled] {
            assert!(s.is_terminal(), "{s} should be terminal");
        }
    }

    #[test]
    fn outcome_maps_to_final_state() {
        assert_eq!(WorkerOutcome::Completed.final_state(), WorkerState::Completed);
        assert_eq!(WorkerOutcome::Crashed.final_state(), WorkerState::Failed);
        assert_eq!(WorkerOutcome::Canceled.final_state(), WorkerState::Canceled);
        assert!(WorkerOutcome::Completed.is_success());
        assert!(!WorkerOutcome::Failed.is_success());
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_string(&WorkerState::ConfiguringSearch).unwrap();
        assert_eq!(json, r#""configuringSearch""#);
    }
}
