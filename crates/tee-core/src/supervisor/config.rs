use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pool sizing and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolConfig {
    /// Most workers alive at once.
    pub max_workers: usize,
    /// Pause between two launches.
    pub stagger_ms: u64,
    /// Readiness gate poll interval.
    pub gate_poll_ms: u64,
    /// Wall-clock poll interval while waiting for the booking window.
    pub target_poll_ms: u64,
    /// Pause when the pool is full.
    pub busy_poll_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            stagger_ms: 2500,
            gate_poll_ms: 100,
            target_poll_ms: 10,
            busy_poll_ms: 50,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_workers == 0 {
            return Err(CoreError::InvalidConfig("pool.maxWorkers must be at least 1".into()));
        }
        if self.stagger_ms == 0 {
            return Err(CoreError::InvalidConfig("pool.staggerMs must be positive".into()));
        }
        for (name, value) in [
            ("pool.gatePollMs", self.gate_poll_ms),
            ("pool.targetPollMs", self.target_poll_ms),
            ("pool.busyPollMs", self.busy_poll_ms),
        ] {
            if value == 0 {
                return Err(CoreError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn gate_poll(&self) -> Duration {
        Duration::from_millis(self.gate_poll_ms)
    }

    pub fn target_poll(&self) -> Duration {
        Duration::from_millis(self.target_poll_ms)
    }

    pub fn busy_poll(&self) -> Duration {
        Duration::from_millis(self.busy_poll_ms)
    }
}
