use std::fmt;

use serde::{Deserialize, Serialize};
use time::Time;

use crate::error::{ModelError, ModelResult};

/// Wall-clock instant (time of day) at which booking opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TargetTime {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Rejects out-of-range components.
    pub fn validate(&self) -> ModelResult<()> {
        if self.hour > 23 || self.minute > 59 || self.second > 59 {
            return Err(ModelError::Invalid(format!("target time {self} is out of range")));
        }
        Ok(())
    }

    /// `true` when `now` falls inside this exact second.
    pub fn matches(&self, now: Time) -> bool {
        now.hour() == self.hour && now.minute() == self.minute && now.second() == self.second
    }
}

impl Default for TargetTime {
    fn default() -> Self {
        Self::new(19, 0, 0)
    }
}

impl fmt::Display for TargetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}
