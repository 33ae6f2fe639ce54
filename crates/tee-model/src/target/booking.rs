use serde::{Deserialize, Serialize};

use crate::{
    error::{ModelError, ModelResult},
    target::{TargetDay, TargetTime},
};

/// Booking page used when nothing else is configured.
pub const DEFAULT_BOOKING_URL: &str = "https://foreupsoftware.com/index.php/booking/19765/2431#teetimes";

/// Course picked from the schedule dropdown when nothing else is configured.
pub const DEFAULT_COURSE: &str = "Bethpage Yellow Course";

/// What to book and when booking opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingTarget {
    /// Booking page the workers navigate to.
    pub url: String,
    /// Visible text of the course option in the schedule dropdown.
    pub course: String,
    /// Weekday of the tee time to reserve.
    pub day: TargetDay,
    /// Time of day at which the pool starts launching workers.
    pub opens_at: TargetTime,
}

impl BookingTarget {
    /// Validate the target before any worker uses it.
    ///
    /// Rules:
    /// - `url` and `course` are not empty or whitespace-only.
    /// - `opens_at` is a valid time of day.
    pub fn validate(&self) -> ModelResult<()> {
        if self.url.trim().is_empty() {
            return Err(ModelError::Invalid("booking url is empty".into()));
        }
        if self.course.trim().is_empty() {
            return Err(ModelError::Invalid("course name is empty".into()));
        }
        self.opens_at.validate()
    }
}

impl Default for BookingTarget {
    fn default() -> Self {
        Self {
            url: DEFAULT_BOOKING_URL.to_string(),
            course: DEFAULT_COURSE.to_string(),
            day: TargetDay::default(),
            opens_at: TargetTime::default(),
        }
    }
}
