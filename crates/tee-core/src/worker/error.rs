use tee_model::{PlayerCount, WorkerOutcome};
use thiserror::Error;

use crate::browser::BrowserError;

/// Why a booking run stopped before completion.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking site unreachable: {0}")]
    Unreachable(String),

    #[error("required page control missing: {0}")]
    MissingControl(&'static str),

    #[error("no suitable tee time for {players} players")]
    NoSuitableSlot { players: PlayerCount },

    #[error("player count {0} cannot be booked")]
    InvalidPreference(PlayerCount),

    #[error("canceled by supervisor")]
    Canceled,

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Errors nobody anticipated; these get a crash record.
    pub fn is_unexpected(&self) -> bool {
        match self {
            BookingError::Browser(e) => !e.is_lookup_failure(),
            BookingError::Internal(_) => true,
            _ => false,
        }
    }

    pub fn outcome(&self) -> WorkerOutcome {
        match self {
            BookingError::Canceled => WorkerOutcome::Canceled,
            e if e.is_unexpected() => WorkerOutcome::Crashed,
            _ => WorkerOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_are_plain_failures() {
        let e = BookingError::from(BrowserError::NotFound(".btn".into()));
        assert!(!e.is_unexpected());
        assert_eq!(e.outcome(), WorkerOutcome::Failed);

        let e = BookingError::from(BrowserError::Timeout("find".into()));
        assert_eq!(e.outcome(), WorkerOutcome::Failed);
    }

    #[test]
    fn transport_errors_are_crashes() {
        let e = BookingError::from(BrowserError::Transport("reset".into()));
        assert!(e.is_unexpected());
        assert_eq!(e.outcome(), WorkerOutcome::Crashed);
    }

    #[test]
    fn cancel_maps_to_canceled() {
        assert_eq!(BookingError::Canceled.outcome(), WorkerOutcome::Canceled);
        assert_eq!(
            BookingError::MissingControl("x").outcome(),
            WorkerOutcome::Failed
        );
    }
}
